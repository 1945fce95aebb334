//! Implementation of `berth init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::{generate_default_manifest, MANIFEST_NAME};

/// Write a starter Berth.toml into `path`.
///
/// The package name defaults to the directory name.
pub fn init_package(path: &Path, name: Option<&str>) -> Result<PathBuf> {
    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("cannot infer a package name from `{}`", path.display()))?,
    };

    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))?;
    fs::write(&manifest_path, generate_default_manifest(&name))
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    Ok(manifest_path)
}
