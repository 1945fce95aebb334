//! Target and file naming for generated CMake files.
//!
//! Also the pre-generation validation of a package's names: the targets file
//! assumes every root, component and alias name is distinct, so collisions
//! within one package are rejected here before anything is rendered.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Error in a package's target names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("empty target name")]
    Empty,

    #[error("component `{name}` is declared more than once")]
    DuplicateComponent { name: String },

    #[error("alias `{alias}` of `{aliased}` has the same name as the {shadowed} target")]
    AliasShadowsTarget {
        alias: String,
        /// Target the alias was declared for
        aliased: String,
        /// `root` or `component`
        shadowed: &'static str,
    },

    #[error("alias `{alias}` is declared more than once")]
    DuplicateAlias { alias: String },

    #[error("component `{component}` requires unknown component `{requirement}`")]
    UnknownRequirement {
        component: String,
        requirement: String,
    },
}

/// Ordered alias → target table.
///
/// Iteration follows insertion order so generated files are byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Create an empty table.
    pub fn new() -> Self {
        AliasTable::default()
    }

    /// Map every alias in `aliases` to `target`, in order.
    pub fn for_target<I, S>(target: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AliasTable {
            entries: aliases
                .into_iter()
                .map(|alias| (alias.into(), target.to_string()))
                .collect(),
        }
    }

    /// Append an alias.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.entries.push((alias.into(), target.into()));
    }

    /// Iterate `(alias, target)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Namespace used for component targets: `ns` for a root target `ns::name`,
/// otherwise the root target name itself.
pub fn namespace_of(root_target_name: &str) -> &str {
    match root_target_name.split_once("::") {
        Some((namespace, _)) => namespace,
        None => root_target_name,
    }
}

/// Root target name, `<name>::<name>` unless overridden.
pub fn root_target_name(package_name: &str, declared: Option<&str>) -> String {
    match declared {
        Some(name) => name.to_string(),
        None => format!("{}::{}", package_name, package_name),
    }
}

/// Component target name, `<namespace>::<component>` unless overridden.
pub fn component_target_name(root_target_name: &str, component: &str, declared: Option<&str>) -> String {
    match declared {
        Some(name) => name.to_string(),
        None => format!("{}::{}", namespace_of(root_target_name), component),
    }
}

/// Upper-case configuration suffix used in variable names (`RELEASE`).
pub fn config_suffix(configuration: &str) -> String {
    configuration.to_uppercase()
}

/// Turn a target name into something usable inside a CMake variable name.
///
/// Every run of characters outside `[A-Za-z0-9]` becomes one `_`, so
/// `app::core`, `app-core` and `app__core` all map to `app_core`.
pub fn variable_prefix(name: &str) -> String {
    let mut prefix = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && prefix.ends_with('_') {
            continue;
        }
        prefix.push(c);
    }
    prefix
}

/// CMake variable names shared by the data and finder files of one
/// (package, configuration) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variables {
    prefix: String,
    suffix: String,
}

impl Variables {
    pub fn new(stem: &str, configuration: &str) -> Self {
        Variables {
            prefix: variable_prefix(stem),
            suffix: config_suffix(configuration),
        }
    }

    /// Configuration-independent list of component target names.
    pub fn component_names(&self) -> String {
        format!("{}_COMPONENT_NAMES", self.prefix)
    }

    pub fn package_folder(&self) -> String {
        format!("{}_PACKAGE_FOLDER_{}", self.prefix, self.suffix)
    }

    /// `<stem>_<FIELD>_<CONFIG>`
    pub fn root(&self, field: &str) -> String {
        format!("{}_{}_{}", self.prefix, field, self.suffix)
    }

    /// `<stem>_<component>_<FIELD>_<CONFIG>`
    pub fn component(&self, component: &str, field: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            self.prefix,
            variable_prefix(component),
            field,
            self.suffix
        )
    }
}

/// File naming scheme of one package's generated files.
///
/// In module mode every file gets a `module-` prefix so it can coexist with
/// the config-mode files of the same package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    stem: String,
    module_mode: bool,
}

impl FileNames {
    pub fn new(stem: impl Into<String>, module_mode: bool) -> Self {
        FileNames {
            stem: stem.into(),
            module_mode,
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn module_mode(&self) -> bool {
        self.module_mode
    }

    fn prefix(&self) -> &'static str {
        if self.module_mode {
            "module-"
        } else {
            ""
        }
    }

    /// `<prefix><stem>Targets.cmake`
    pub fn targets_file(&self) -> String {
        format!("{}{}Targets.cmake", self.prefix(), self.stem)
    }

    /// Glob matching every per-configuration data file.
    pub fn data_glob(&self) -> String {
        format!("{}{}-*-data.cmake", self.prefix(), self.stem)
    }

    /// Glob matching every per-configuration finder file.
    pub fn finder_glob(&self) -> String {
        format!("{}{}-Target-*.cmake", self.prefix(), self.stem)
    }

    /// `<prefix><stem>-<config>-<arch>-data.cmake`
    pub fn data_file(&self, configuration: &str, arch: &str) -> String {
        format!(
            "{}{}-{}-{}-data.cmake",
            self.prefix(),
            self.stem,
            configuration.to_lowercase(),
            arch
        )
    }

    /// `<prefix><stem>-Target-<config>.cmake`
    pub fn finder_file(&self, configuration: &str) -> String {
        format!(
            "{}{}-Target-{}.cmake",
            self.prefix(),
            self.stem,
            configuration.to_lowercase()
        )
    }

    /// `Find<stem>.cmake` in module mode, `<stem>-config.cmake` otherwise.
    pub fn config_file(&self) -> String {
        if self.module_mode {
            format!("Find{}.cmake", self.stem)
        } else {
            format!("{}-config.cmake", self.stem)
        }
    }

    /// `<stem>-config-version.cmake`, only written in config mode.
    pub fn version_file(&self) -> Option<String> {
        (!self.module_mode).then(|| format!("{}-config-version.cmake", self.stem))
    }
}

/// Reject name sets the targets file cannot express unambiguously.
///
/// `component_names` are the components' target names; `component_aliases`
/// pairs each component name with its alias table.
pub fn validate_names(
    root_target_name: &str,
    component_names: &[String],
    root_aliases: &AliasTable,
    component_aliases: &[(String, AliasTable)],
) -> Result<(), NameError> {
    if root_target_name.trim().is_empty() {
        return Err(NameError::Empty);
    }

    let mut targets: HashMap<&str, &'static str> = HashMap::new();
    targets.insert(root_target_name, "root");
    for name in component_names {
        if name.trim().is_empty() {
            return Err(NameError::Empty);
        }
        if targets.insert(name, "component").is_some() {
            return Err(NameError::DuplicateComponent { name: name.clone() });
        }
    }

    let mut aliases: HashSet<&str> = HashSet::new();
    let all_aliases = root_aliases
        .iter()
        .chain(component_aliases.iter().flat_map(|(_, table)| table.iter()));
    for (alias, aliased) in all_aliases {
        if alias.trim().is_empty() {
            return Err(NameError::Empty);
        }
        if let Some(&shadowed) = targets.get(alias) {
            return Err(NameError::AliasShadowsTarget {
                alias: alias.to_string(),
                aliased: aliased.to_string(),
                shadowed,
            });
        }
        if !aliases.insert(alias) {
            return Err(NameError::DuplicateAlias {
                alias: alias.to_string(),
            });
        }
    }

    Ok(())
}
