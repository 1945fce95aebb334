//! Exported library information of a package.
//!
//! `CppInfo` is the read side of the manifest's `[cpp_info]` and
//! `[components.*]` sections: everything the CMake generator needs to know
//! about what a package exports, with components in a stable order.

use crate::core::manifest::{ComponentConfig, Manifest};

/// Library information for the root package or one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    pub target_name: Option<String>,
    pub aliases: Vec<String>,
    pub libs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub defines: Vec<String>,
    pub requires: Vec<String>,
}

impl From<&ComponentConfig> for ComponentInfo {
    fn from(config: &ComponentConfig) -> Self {
        ComponentInfo {
            target_name: config.target_name.clone(),
            aliases: config.aliases.clone(),
            libs: config.libs.clone(),
            include_dirs: config.include_dirs.clone(),
            lib_dirs: config.lib_dirs.clone(),
            defines: config.defines.clone(),
            requires: config.requires.clone(),
        }
    }
}

/// Exported information of a whole package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppInfo {
    /// Root-level information
    pub root: ComponentInfo,

    /// Components, sorted by name
    pub components: Vec<(String, ComponentInfo)>,
}

impl CppInfo {
    /// Build from a manifest.
    ///
    /// Root aliases come from `[cmake] aliases`; `[cpp_info] aliases` are
    /// appended after them.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut root = ComponentInfo::from(&manifest.cpp_info);
        if root.target_name.is_none() {
            root.target_name = manifest.cmake.target_name.clone();
        }
        let mut aliases = manifest.cmake.aliases.clone();
        aliases.append(&mut root.aliases);
        root.aliases = aliases;

        let components = manifest
            .components
            .iter()
            .map(|(name, config)| (name.clone(), ComponentInfo::from(config)))
            .collect();

        CppInfo { root, components }
    }

    /// Whether the package declares any components.
    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&ComponentInfo> {
        self.components
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, info)| info)
    }

    /// Component names, in order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|(n, _)| n.as_str())
    }
}
