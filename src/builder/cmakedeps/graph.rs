//! The component graph a package exports to CMake.

use crate::builder::cmakedeps::naming::{
    component_target_name, root_target_name, validate_names, AliasTable, NameError,
};
use crate::core::cpp_info::{ComponentInfo, CppInfo};

/// One component with its resolved target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentTarget {
    /// Component name as declared in the manifest.
    pub name: String,
    /// Qualified CMake target name.
    pub target_name: String,
    pub aliases: AliasTable,
    /// Targets this component links: sibling component targets or external targets.
    pub requires: Vec<String>,
    pub info: ComponentInfo,
}

/// Root target, components and aliases of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentGraph {
    pub package_name: String,
    pub root_target_name: String,
    pub root_aliases: AliasTable,
    pub root: ComponentInfo,
    /// Components in manifest (name) order.
    pub components: Vec<ComponentTarget>,
}

impl ComponentGraph {
    /// Resolve names for a package and validate them.
    pub fn new(package_name: &str, cpp_info: &CppInfo) -> Result<Self, NameError> {
        let root_target = root_target_name(package_name, cpp_info.root.target_name.as_deref());
        let root_aliases = AliasTable::for_target(&root_target, cpp_info.root.aliases.iter().cloned());

        let targets: Vec<(String, String)> = cpp_info
            .components
            .iter()
            .map(|(name, info)| {
                let target = component_target_name(&root_target, name, info.target_name.as_deref());
                (name.clone(), target)
            })
            .collect();

        let mut components = Vec::with_capacity(targets.len());
        for ((name, info), (_, target_name)) in cpp_info.components.iter().zip(&targets) {
            let requires = info
                .requires
                .iter()
                .map(|req| resolve_requirement(name, req, &targets))
                .collect::<Result<Vec<_>, _>>()?;

            components.push(ComponentTarget {
                name: name.clone(),
                target_name: target_name.clone(),
                aliases: AliasTable::for_target(target_name, info.aliases.iter().cloned()),
                requires,
                info: info.clone(),
            });
        }

        let graph = ComponentGraph {
            package_name: package_name.to_string(),
            root_target_name: root_target,
            root_aliases,
            root: cpp_info.root.clone(),
            components,
        };
        validate_names(
            &graph.root_target_name,
            &graph.component_target_names(),
            &graph.root_aliases,
            &graph.component_aliases(),
        )?;

        Ok(graph)
    }

    /// Component target names, in order.
    pub fn component_target_names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.target_name.clone()).collect()
    }

    /// Per-component alias tables, in order.
    pub fn component_aliases(&self) -> Vec<(String, AliasTable)> {
        self.components
            .iter()
            .map(|c| (c.name.clone(), c.aliases.clone()))
            .collect()
    }

    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }
}

/// A requirement is a sibling component name or a qualified external target.
fn resolve_requirement(
    component: &str,
    requirement: &str,
    targets: &[(String, String)],
) -> Result<String, NameError> {
    if let Some((_, target)) = targets.iter().find(|(name, _)| name == requirement) {
        return Ok(target.clone());
    }
    if requirement.contains("::") {
        return Ok(requirement.to_string());
    }
    Err(NameError::UnknownRequirement {
        component: component.to_string(),
        requirement: requirement.to_string(),
    })
}
