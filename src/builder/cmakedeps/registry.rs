//! Consumer-side evaluation of planned targets files.
//!
//! [`TargetRegistry`] models the target namespace of one consuming CMake
//! project. Several packages' targets files may be loaded into it, and a
//! name may legitimately be declared by more than one of them: the first
//! declaration wins, later ones produce a [`TargetNameConflict`] warning and
//! do not redeclare it.
//!
//! Only the targets files are evaluated. Finder files are not modelled: in a
//! real consuming build their `set_property(TARGET <name> APPEND ...)` calls
//! still run, so a later package's libraries are appended to whichever target
//! was declared first under that name. `link_libraries` here reflects the
//! targets file declarations alone.

use std::collections::BTreeMap;
use std::fmt;

use crate::builder::cmakedeps::ir::{Declaration, Statement, TargetKind, TargetsScript};
use crate::util::diagnostic::Diagnostic;

/// A declared `INTERFACE IMPORTED` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedTarget {
    pub name: String,
    /// Origin (package) of the file that declared it.
    pub declared_by: String,
    pub link_libraries: Vec<String>,
}

/// A declaration skipped because the name already existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetNameConflict {
    pub name: String,
    pub declared_by: String,
    pub attempted_by: String,
}

impl TargetNameConflict {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.to_string())
            .note(format!("first declared by `{}`", self.declared_by))
            .note(format!("declaration from `{}` skipped", self.attempted_by))
    }
}

impl fmt::Display for TargetNameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target name '{}' already exists.", self.name)
    }
}

/// Result of one declare-if-absent step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetEvent {
    /// Informational: a new target was declared.
    Declared { name: String },
    /// Warning: the name existed, nothing was changed.
    Conflict(TargetNameConflict),
}

impl TargetEvent {
    pub fn is_warning(&self) -> bool {
        matches!(self, TargetEvent::Conflict(_))
    }
}

/// Target namespace of a consuming build.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<String, ImportedTarget>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        TargetRegistry::default()
    }

    /// Declare `decl` unless a target of that name exists.
    pub fn declare(&mut self, decl: &Declaration, origin: &str) -> TargetEvent {
        if let Some(existing) = self.targets.get(&decl.name) {
            let conflict = TargetNameConflict {
                name: decl.name.clone(),
                declared_by: existing.declared_by.clone(),
                attempted_by: origin.to_string(),
            };
            tracing::warn!("{}", conflict);
            return TargetEvent::Conflict(conflict);
        }

        let link_libraries = match &decl.kind {
            TargetKind::Alias { target } => vec![target.clone()],
            TargetKind::Root | TargetKind::Component => Vec::new(),
        };
        self.targets.insert(
            decl.name.clone(),
            ImportedTarget {
                name: decl.name.clone(),
                declared_by: origin.to_string(),
                link_libraries,
            },
        );
        tracing::debug!("Target declared '{}'", decl.name);

        TargetEvent::Declared {
            name: decl.name.clone(),
        }
    }

    /// Evaluate every declaration of a targets file, in order.
    ///
    /// Include globs are not followed, so data and finder files are never
    /// evaluated.
    pub fn load(&mut self, script: &TargetsScript, origin: &str) -> Vec<TargetEvent> {
        script
            .statements
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::DeclareIfAbsent(decl) => Some(self.declare(decl, origin)),
                Statement::IncludeGlob { .. } => None,
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ImportedTarget> {
        self.targets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::cmakedeps::naming::{AliasTable, FileNames};
    use crate::builder::cmakedeps::targets::TargetsTemplate;
    use crate::builder::cmakedeps::MessageMode;

    fn plan(root: &str, components: &[&str], root_aliases: &[&str]) -> TargetsScript {
        let file_names = FileNames::new(root, false);
        let components: Vec<String> = components.iter().map(|s| s.to_string()).collect();
        let root_aliases = AliasTable::for_target(root, root_aliases.iter().copied());
        TargetsTemplate {
            root_target_name: root,
            component_names: &components,
            root_aliases: &root_aliases,
            component_aliases: &[],
            file_names: &file_names,
            message_mode: MessageMode::Status,
        }
        .plan()
    }

    fn warnings(events: &[TargetEvent]) -> Vec<&TargetNameConflict> {
        events
            .iter()
            .filter_map(|e| match e {
                TargetEvent::Conflict(c) => Some(c),
                TargetEvent::Declared { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_first_load_declares_everything_in_order() {
        let mut registry = TargetRegistry::new();
        let events = registry.load(&plan("app", &["core", "io"], &["App"]), "app");

        let declared: Vec<_> = events
            .iter()
            .map(|e| match e {
                TargetEvent::Declared { name } => name.as_str(),
                TargetEvent::Conflict(c) => panic!("unexpected conflict: {c}"),
            })
            .collect();
        assert_eq!(declared, vec!["app", "core", "io", "App"]);
        assert!(warnings(&events).is_empty());
        assert_eq!(registry.get("App").unwrap().link_libraries, vec!["app"]);
    }

    #[test]
    fn test_name_declared_by_other_package_warns_once() {
        let mut registry = TargetRegistry::new();

        // Another package's file already declared `core` as an alias of its own target.
        let other = TargetsScript {
            statements: vec![Statement::DeclareIfAbsent(Declaration::alias(
                "core",
                "other::core",
            ))],
        };
        registry.load(&other, "other");

        let events = registry.load(&plan("app", &["core", "io"], &["App"]), "app");
        let conflicts = warnings(&events);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name, "core");
        assert_eq!(conflicts[0].declared_by, "other");
        assert!(events.iter().filter(|e| e.is_warning()).count() == 1);

        let core = registry.get("core").unwrap();
        assert_eq!(core.declared_by, "other");
        assert_eq!(core.link_libraries, vec!["other::core"]);
        assert!(registry.contains("io"));
    }

    #[test]
    fn test_second_pass_is_a_no_op_with_warnings() {
        let mut registry = TargetRegistry::new();
        let script = plan("app", &["core"], &[]);

        registry.load(&script, "app");
        let before = registry.len();
        let events = registry.load(&script, "app");

        assert_eq!(registry.len(), before);
        assert_eq!(warnings(&events).len(), 2);
        assert!(events.iter().all(TargetEvent::is_warning));
    }

    #[test]
    fn test_conflict_diagnostic_is_a_warning() {
        let conflict = TargetNameConflict {
            name: "core".to_string(),
            declared_by: "other".to_string(),
            attempted_by: "app".to_string(),
        };
        let output = conflict.to_diagnostic().format(false);
        assert!(output.starts_with("warning: Target name 'core' already exists."));
        assert!(output.contains("  note: first declared by `other`\n"));
        assert!(output.contains("  note: declaration from `app` skipped\n"));
    }
}
