//! Per-configuration data file (`<stem>-<config>-<arch>-data.cmake`).
//!
//! Holds the concrete values of one configuration: package folder, include
//! and library directories, library names, definitions and inter-target
//! dependencies. It also appends the package's component target names to
//! the configuration-independent `<stem>_COMPONENT_NAMES` list.

use crate::builder::cmakedeps::graph::ComponentGraph;
use crate::builder::cmakedeps::naming::{FileNames, Variables};
use crate::core::cpp_info::ComponentInfo;

/// Inputs of one data file.
#[derive(Debug, Clone)]
pub struct DataTemplate<'a> {
    pub graph: &'a ComponentGraph,
    pub file_names: &'a FileNames,
    pub configuration: &'a str,
    pub arch: &'a str,
    /// CMake expression evaluating to the package folder.
    pub package_folder: &'a str,
}

impl DataTemplate<'_> {
    pub fn filename(&self) -> String {
        self.file_names.data_file(self.configuration, self.arch)
    }

    pub fn render(&self) -> String {
        let vars = Variables::new(self.file_names.stem(), self.configuration);
        let mut out = String::new();

        out.push_str(
            "########### AGGREGATED COMPONENTS AND DEPENDENCIES FOR THE MULTI CONFIG #####################\n\
             #############################################################################################\n\n",
        );
        if self.graph.has_components() {
            out.push_str(&format!(
                "list(APPEND {} {})\nlist(REMOVE_DUPLICATES {})\n\n",
                vars.component_names(),
                self.graph.component_target_names().join(" "),
                vars.component_names()
            ));
        } else {
            out.push_str(&format!("set({} \"\")\n\n", vars.component_names()));
        }

        out.push_str(
            "########### VARIABLES #######################################################################\n\
             #############################################################################################\n",
        );
        out.push_str(&format!(
            "get_filename_component({} \"{}\" ABSOLUTE)\n",
            vars.package_folder(),
            self.package_folder
        ));

        let root_dependencies = if self.graph.has_components() {
            self.graph.component_target_names()
        } else {
            self.graph.root.requires.clone()
        };
        out.push_str(&self.component_variables(
            &self.graph.root,
            &root_dependencies,
            |field| vars.root(field),
            &vars,
        ));

        for component in &self.graph.components {
            out.push_str(&format!(
                "\n########### COMPONENT {} VARIABLES #############################################\n",
                component.target_name
            ));
            out.push_str(&self.component_variables(
                &component.info,
                &component.requires,
                |field| vars.component(&component.name, field),
                &vars,
            ));
        }

        out
    }

    fn component_variables(
        &self,
        info: &ComponentInfo,
        dependencies: &[String],
        var: impl Fn(&str) -> String,
        vars: &Variables,
    ) -> String {
        let folder = format!("${{{}}}", vars.package_folder());
        let paths = |dirs: &[String]| -> String {
            dirs.iter()
                .map(|dir| quote(&format!("{}/{}", folder, dir.replace('\\', "/").trim_end_matches('/'))))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let quoted = |items: &[String]| -> String {
            items.iter().map(|s| quote(s)).collect::<Vec<_>>().join(" ")
        };

        let mut out = String::new();
        out.push_str(&format!("set({} {})\n", var("INCLUDE_DIRS"), paths(&info.include_dirs)));
        out.push_str(&format!("set({} {})\n", var("LIB_DIRS"), paths(&info.lib_dirs)));
        out.push_str(&format!("set({} {})\n", var("LIBS"), info.libs.join(" ")));
        out.push_str(&format!("set({} {})\n", var("COMPILE_DEFINITIONS"), quoted(&info.defines)));
        out.push_str(&format!("set({} {})\n", var("DEPENDENCIES"), dependencies.join(" ")));
        out
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}
