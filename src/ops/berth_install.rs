//! Implementation of `berth install`: write a package's CMake files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::cmakedeps::{CMakeDeps, FileNames, MessageMode};
use crate::core::{Package, Settings};
use crate::util::fs::{ensure_dir, glob_files, write_if_changed};

/// Options for generating the CMake files.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Must define `build_type` and `arch`
    pub settings: Settings,

    /// Folder the generated files are written to
    pub install_folder: PathBuf,

    /// Folder holding the package's headers and libraries
    pub package_folder: PathBuf,

    /// Generate `Find<name>.cmake` modules instead of config files
    pub module_mode: bool,

    pub message_mode: MessageMode,
}

/// Files touched by one install.
#[derive(Debug, Clone, Default)]
pub struct InstallResult {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl InstallResult {
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.written.iter().chain(&self.unchanged)
    }
}

/// Generate and write every CMake file of `package` for one configuration.
///
/// Files of other configurations already in the install folder are left in
/// place; the shared files are rewritten only when their contents change.
pub fn install(package: &Package, opts: &InstallOptions) -> Result<InstallResult> {
    ensure_dir(&opts.install_folder)?;

    let deps = CMakeDeps::new(
        package,
        &opts.settings,
        &opts.package_folder,
        &opts.install_folder,
        opts.module_mode,
    )?
    .with_message_mode(opts.message_mode);

    let mut result = InstallResult::default();
    for file in deps.files() {
        let path = opts.install_folder.join(&file.name);
        if write_if_changed(&path, &file.contents)? {
            tracing::debug!("wrote {}", path.display());
            result.written.push(path);
        } else {
            tracing::debug!("{} is up to date", path.display());
            result.unchanged.push(path);
        }
    }

    let configurations = installed_configurations(&opts.install_folder, deps.file_names())?;
    tracing::info!(
        "Generated CMake files for {} {} ({}), configurations: {}",
        package.name(),
        package.version(),
        deps.configuration(),
        configurations
            .iter()
            .map(|(config, arch)| format!("{}-{}", config, arch))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(result)
}

/// `(configuration, arch)` pairs with a data file in `folder`, as written
/// in the file names (configuration lowercased).
pub fn installed_configurations(folder: &Path, file_names: &FileNames) -> Result<Vec<(String, String)>> {
    let pattern = file_names.data_glob();
    let data_files = glob_files(folder, &pattern)
        .with_context(|| format!("failed to list data files in {}", folder.display()))?;
    let (prefix, suffix) = pattern.split_once('*').unwrap_or((pattern.as_str(), ""));

    Ok(data_files
        .iter()
        .filter_map(|path| path.file_name()?.to_str())
        .filter_map(|name| name.strip_prefix(prefix)?.strip_suffix(suffix))
        .filter_map(|rest| rest.split_once('-'))
        .map(|(config, arch)| (config.to_string(), arch.to_string()))
        .collect())
}
