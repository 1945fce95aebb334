//! Package - manifest plus the directory it was loaded from.

use std::path::{Path, PathBuf};

use anyhow::Result;
use semver::Version;

use crate::core::cpp_info::CppInfo;
use crate::core::manifest::{LayoutConfig, Manifest, MANIFEST_NAME};

/// A package with its manifest and location.
#[derive(Debug, Clone)]
pub struct Package {
    /// The parsed manifest
    manifest: Manifest,

    /// Parsed version
    version: Version,

    /// Root directory of the package
    root: PathBuf,
}

impl Package {
    /// Create a new package from a manifest and root directory.
    pub fn new(manifest: Manifest, root: PathBuf) -> Result<Self> {
        let version = manifest.version()?;

        Ok(Package {
            manifest,
            version,
            root,
        })
    }

    /// Load a package from a manifest file.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::new(manifest, root)
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        self.manifest.name()
    }

    /// Get the package version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get the manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Get the package root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the manifest file path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_NAME)
    }

    /// Get the declared folder layout.
    pub fn layout(&self) -> &LayoutConfig {
        &self.manifest.layout
    }

    /// Get the exported library information.
    pub fn cpp_info(&self) -> CppInfo {
        CppInfo::from_manifest(&self.manifest)
    }

    /// Stem of the generated CMake file names.
    pub fn cmake_file_name(&self) -> &str {
        self.manifest
            .cmake
            .file_name
            .as_deref()
            .unwrap_or_else(|| self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_package() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);
        std::fs::write(
            &path,
            "[package]\nname = \"zlib\"\nversion = \"1.3.1\"\n\n[cmake]\nfile_name = \"ZLIB\"\n",
        )
        .unwrap();

        let pkg = Package::load(&path).unwrap();
        assert_eq!(pkg.name(), "zlib");
        assert_eq!(pkg.version(), &Version::new(1, 3, 1));
        assert_eq!(pkg.root(), tmp.path());
        assert_eq!(pkg.manifest_path(), path);
        assert_eq!(pkg.cmake_file_name(), "ZLIB");
    }
}
