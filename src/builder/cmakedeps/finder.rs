//! Per-configuration finder file (`<stem>-Target-<config>.cmake`).
//!
//! Locates each library named in the data file and attaches the
//! configuration's link libraries, include directories and definitions to
//! the already-declared targets, guarded by `$<CONFIG:...>` so several
//! configurations can coexist on the same targets.

use crate::builder::cmakedeps::graph::ComponentGraph;
use crate::builder::cmakedeps::naming::{FileNames, Variables};

/// Inputs of one finder file.
#[derive(Debug, Clone)]
pub struct FinderTemplate<'a> {
    pub graph: &'a ComponentGraph,
    pub file_names: &'a FileNames,
    pub configuration: &'a str,
}

impl FinderTemplate<'_> {
    pub fn filename(&self) -> String {
        self.file_names.finder_file(self.configuration)
    }

    pub fn render(&self) -> String {
        let vars = Variables::new(self.file_names.stem(), self.configuration);
        let mut out = String::new();

        out.push_str(
            "# Avoid multiple calls to find_package to append duplicated properties to the targets\n\
             include_guard()\n\n",
        );
        out.push_str(FIND_LIBRARIES);

        for component in &self.graph.components {
            out.push_str(&format!(
                "\n########### COMPONENT {} TARGET PROPERTIES ######################################\n",
                component.target_name
            ));
            out.push_str(&self.target_properties(&component.target_name, |field| {
                vars.component(&component.name, field)
            }));
        }

        out.push_str(&format!(
            "\n########### TARGET {} PROPERTIES ################################################\n",
            self.graph.root_target_name
        ));
        out.push_str(&self.target_properties(&self.graph.root_target_name, |field| vars.root(field)));

        out
    }

    fn target_properties(&self, target: &str, var: impl Fn(&str) -> String) -> String {
        let config = self.configuration;
        let guarded = |field: &str| format!("\"$<$<CONFIG:{}>:${{{}}}>\"", config, var(field));

        let found = var("LIB_TARGETS");
        format!(
            "berth_find_libraries({found} \"${{{libs}}}\" \"${{{lib_dirs}}}\")\n\
             set_property(TARGET {target} APPEND PROPERTY INTERFACE_LINK_LIBRARIES\n             \
             {link}\n             \
             {deps})\n\
             set_property(TARGET {target} APPEND PROPERTY INTERFACE_INCLUDE_DIRECTORIES\n             \
             {includes})\n\
             set_property(TARGET {target} APPEND PROPERTY INTERFACE_COMPILE_DEFINITIONS\n             \
             {defines})\n",
            libs = var("LIBS"),
            lib_dirs = var("LIB_DIRS"),
            link = guarded("LIB_TARGETS"),
            deps = guarded("DEPENDENCIES"),
            includes = guarded("INCLUDE_DIRS"),
            defines = guarded("COMPILE_DEFINITIONS"),
        )
    }
}

/// Resolves library names to full paths inside the given directories,
/// falling back to the bare name (with a warning) when a library is missing.
const FIND_LIBRARIES: &str = r#"function(berth_find_libraries OUT_VAR LIBS LIB_DIRS)
    set(_FOUND_LIBS "")
    foreach(_LIB ${LIBS})
        unset(_BERTH_LIB_PATH CACHE)
        find_library(_BERTH_LIB_PATH NAMES ${_LIB} PATHS ${LIB_DIRS}
                     NO_DEFAULT_PATH NO_CMAKE_FIND_ROOT_PATH)
        if(_BERTH_LIB_PATH)
            list(APPEND _FOUND_LIBS ${_BERTH_LIB_PATH})
        else()
            message(WARNING "Library '${_LIB}' not found in '${LIB_DIRS}', linking by name")
            list(APPEND _FOUND_LIBS ${_LIB})
        endif()
        unset(_BERTH_LIB_PATH CACHE)
    endforeach()
    set(${OUT_VAR} ${_FOUND_LIBS} PARENT_SCOPE)
endfunction()
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cpp_info::CppInfo;
    use crate::core::manifest::Manifest;
    use std::path::Path;

    #[test]
    fn test_finder_file_contents() {
        let manifest = Manifest::parse(
            r#"
[package]
name = "app"
version = "1.0.0"

[components.core]
libs = ["core"]
"#,
            Path::new("Berth.toml"),
        )
        .unwrap();
        let graph = ComponentGraph::new("app", &CppInfo::from_manifest(&manifest)).unwrap();
        let file_names = FileNames::new("app", true);
        let template = FinderTemplate {
            graph: &graph,
            file_names: &file_names,
            configuration: "Debug",
        };

        assert_eq!(template.filename(), "module-app-Target-debug.cmake");

        let text = template.render();
        assert!(text.contains("include_guard()"));
        assert!(text.contains(
            "berth_find_libraries(app_core_LIB_TARGETS_DEBUG \"${app_core_LIBS_DEBUG}\" \"${app_core_LIB_DIRS_DEBUG}\")"
        ));
        assert!(text.contains("set_property(TARGET app::core APPEND PROPERTY INTERFACE_LINK_LIBRARIES"));
        assert!(text.contains("\"$<$<CONFIG:Debug>:${app_core_LIB_TARGETS_DEBUG}>\""));
        assert!(text.contains("\"$<$<CONFIG:Debug>:${app_DEPENDENCIES_DEBUG}>\""));

        // Components get their properties before the root that links them.
        let core = text.find("TARGET app::core APPEND").unwrap();
        let root = text.find("TARGET app::app APPEND").unwrap();
        assert!(core < root);
    }
}
