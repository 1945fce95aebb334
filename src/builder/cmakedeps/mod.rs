//! CMake integration files for one package.
//!
//! For a package with file stem `app`, one generation pass produces:
//!
//! - `appTargets.cmake` - configuration-agnostic, rewritten every pass
//! - `app-<config>-<arch>-data.cmake` - values of one configuration
//! - `app-Target-<config>.cmake` - library finders of one configuration
//! - `app-config.cmake` and `app-config-version.cmake` (or `Findapp.cmake`
//!   in module mode)
//!
//! All rendering is pure; writing the files is left to the caller.

pub mod config_file;
pub mod data;
pub mod finder;
pub mod graph;
pub mod ir;
pub mod naming;
pub mod registry;
pub mod targets;

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::settings::{ConfigurationError, Settings};
use crate::core::Package;
use crate::util::fs::relative_path;

pub use graph::{ComponentGraph, ComponentTarget};
pub use naming::{AliasTable, FileNames, NameError};
pub use registry::{TargetEvent, TargetNameConflict, TargetRegistry};
pub use targets::generate;

/// Whether generated files print informational status messages by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageMode {
    #[default]
    Status,
    Quiet,
}

impl MessageMode {
    pub fn as_cmake(&self) -> &'static str {
        match self {
            MessageMode::Status => "STATUS",
            MessageMode::Quiet => "QUIET",
        }
    }
}

impl FromStr for MessageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(MessageMode::Status),
            "quiet" => Ok(MessageMode::Quiet),
            other => Err(format!("unknown message mode `{}` (expected status or quiet)", other)),
        }
    }
}

/// Lifetime of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileScope {
    /// Shared by every configuration.
    Package,
    /// Belongs to one configuration.
    Configuration,
}

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
    pub scope: FileScope,
}

/// Generator of one package's CMake files for one configuration.
#[derive(Debug, Clone)]
pub struct CMakeDeps<'a> {
    package: &'a Package,
    graph: ComponentGraph,
    file_names: FileNames,
    configuration: String,
    arch: String,
    package_folder: String,
    message_mode: MessageMode,
}

impl<'a> CMakeDeps<'a> {
    /// Prepare generation for `package`, whose binaries live in
    /// `package_folder`, into files that will be written to `generators_folder`.
    pub fn new(
        package: &'a Package,
        settings: &Settings,
        package_folder: &Path,
        generators_folder: &Path,
        module_mode: bool,
    ) -> Result<Self> {
        let configuration = required(settings, "build_type")?;
        let arch = required(settings, "arch")?;

        let graph = ComponentGraph::new(package.name(), &package.cpp_info())
            .with_context(|| format!("invalid target names in package `{}`", package.name()))?;

        Ok(CMakeDeps {
            package,
            graph,
            file_names: FileNames::new(package.cmake_file_name(), module_mode),
            configuration,
            arch,
            package_folder: package_folder_expression(package_folder, generators_folder),
            message_mode: MessageMode::default(),
        })
    }

    /// Set the default message mode of the targets file.
    pub fn with_message_mode(mut self, mode: MessageMode) -> Self {
        self.message_mode = mode;
        self
    }

    pub fn graph(&self) -> &ComponentGraph {
        &self.graph
    }

    pub fn file_names(&self) -> &FileNames {
        &self.file_names
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    /// The targets file alone.
    pub fn targets_file(&self) -> GeneratedFile {
        let component_names = self.graph.component_target_names();
        let component_aliases = self.graph.component_aliases();
        let template = targets::TargetsTemplate {
            root_target_name: &self.graph.root_target_name,
            component_names: &component_names,
            root_aliases: &self.graph.root_aliases,
            component_aliases: &component_aliases,
            file_names: &self.file_names,
            message_mode: self.message_mode,
        };

        GeneratedFile {
            name: template.filename(),
            contents: template.render(),
            scope: FileScope::Package,
        }
    }

    /// Every file of this package and configuration.
    pub fn files(&self) -> Vec<GeneratedFile> {
        let version = self.package.version();
        let mut files = Vec::new();

        let config = config_file::ConfigTemplate {
            file_names: &self.file_names,
            version,
        };
        files.push(GeneratedFile {
            name: config.filename(),
            contents: config.render(),
            scope: FileScope::Package,
        });

        let version_template = config_file::VersionTemplate {
            file_names: &self.file_names,
            version,
        };
        if let Some(name) = version_template.filename() {
            files.push(GeneratedFile {
                name,
                contents: version_template.render(),
                scope: FileScope::Package,
            });
        }

        files.push(self.targets_file());

        let data = data::DataTemplate {
            graph: &self.graph,
            file_names: &self.file_names,
            configuration: &self.configuration,
            arch: &self.arch,
            package_folder: &self.package_folder,
        };
        files.push(GeneratedFile {
            name: data.filename(),
            contents: data.render(),
            scope: FileScope::Configuration,
        });

        let finder = finder::FinderTemplate {
            graph: &self.graph,
            file_names: &self.file_names,
            configuration: &self.configuration,
        };
        files.push(GeneratedFile {
            name: finder.filename(),
            contents: finder.render(),
            scope: FileScope::Configuration,
        });

        files
    }
}

fn required(settings: &Settings, name: &str) -> Result<String> {
    settings.get(name).map(str::to_string).ok_or_else(|| {
        ConfigurationError::UnresolvedVariable {
            variable: name.to_string(),
            expression: format!("{{{}}}", name),
        }
        .into()
    })
}

/// CMake expression for the package folder: relative to the generated file
/// when possible so the install stays relocatable.
fn package_folder_expression(package_folder: &Path, generators_folder: &Path) -> String {
    match relative_path(generators_folder, package_folder) {
        Some(rel) if rel.as_os_str().is_empty() => "${CMAKE_CURRENT_LIST_DIR}".to_string(),
        Some(rel) => format!(
            "${{CMAKE_CURRENT_LIST_DIR}}/{}",
            rel.to_string_lossy().replace('\\', "/")
        ),
        None => package_folder.to_string_lossy().replace('\\', "/"),
    }
}
