//! Berth.toml manifest parsing and schema.
//!
//! The manifest declares a package's folder layout and the CMake-facing
//! component graph:
//!
//! ```toml
//! [package]
//! name = "app"
//! version = "1.0.0"
//!
//! [layout]
//! source = "my_src"
//! build = "{build_type}"
//! no_copy_source = true
//!
//! [cmake]
//! target_name = "app::app"
//! aliases = ["App"]
//!
//! [components.core]
//! libs = ["core"]
//! aliases = ["core_alias"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

/// Errors locating a manifest on disk.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `{}` in `{}` or any parent directory", MANIFEST_NAME, dir.display())]
    NotFound { dir: PathBuf },
}

impl ManifestError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ManifestError::NotFound { dir } => Diagnostic::error(self.to_string())
                .at(dir)
                .help("Run `berth init` to create a Berth.toml"),
        }
    }
}

/// Find the manifest in `dir` or any of its ancestors.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: dir.to_path_buf(),
            });
        }
    }
}

/// The parsed Berth.toml manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Package metadata
    pub package: PackageMetadata,

    /// Folder layout declaration
    #[serde(default)]
    pub layout: LayoutConfig,

    /// CMake naming for the generated targets
    #[serde(default)]
    pub cmake: CMakeConfig,

    /// Library information for the package as a whole
    #[serde(default)]
    pub cpp_info: ComponentConfig,

    /// Named components, ordered by name
    #[serde(default)]
    pub components: BTreeMap<String, ComponentConfig>,
}

/// Package metadata from [package] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,

    /// Package version (semver)
    pub version: String,

    /// Package description
    #[serde(default)]
    pub description: Option<String>,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,
}

impl PackageMetadata {
    /// Parse the version string as semver.
    pub fn version(&self) -> Result<Version> {
        self.version
            .parse()
            .with_context(|| format!("invalid version: {}", self.version))
    }
}

/// Folder layout from the [layout] section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Source subfolder, relative to the package root
    #[serde(default)]
    pub source: Option<String>,

    /// Build subfolder expression, relative to the package root
    #[serde(default)]
    pub build: Option<String>,

    /// Generated files subfolder, relative to the build folder
    #[serde(default)]
    pub generators: Option<String>,

    /// Reference sources in place instead of copying them into the build folder
    #[serde(default)]
    pub no_copy_source: bool,
}

/// CMake naming from the [cmake] section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CMakeConfig {
    /// Stem of the generated file names (defaults to the package name)
    #[serde(default)]
    pub file_name: Option<String>,

    /// Root target name (defaults to `<name>::<name>`)
    #[serde(default)]
    pub target_name: Option<String>,

    /// Extra names for the root target
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Library information for the root package or one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Target name override (components default to `<namespace>::<component>`)
    #[serde(default)]
    pub target_name: Option<String>,

    /// Extra names for this target
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Libraries to link, by name
    #[serde(default)]
    pub libs: Vec<String>,

    /// Include directories, relative to the package folder
    #[serde(default = "default_include_dirs")]
    pub include_dirs: Vec<String>,

    /// Library directories, relative to the package folder
    #[serde(default = "default_lib_dirs")]
    pub lib_dirs: Vec<String>,

    /// Preprocessor definitions
    #[serde(default)]
    pub defines: Vec<String>,

    /// Sibling component names, or fully qualified external targets
    #[serde(default)]
    pub requires: Vec<String>,
}

fn default_include_dirs() -> Vec<String> {
    vec!["include".to_string()]
}

fn default_lib_dirs() -> Vec<String> {
    vec!["lib".to_string()]
}

impl Default for ComponentConfig {
    fn default() -> Self {
        ComponentConfig {
            target_name: None,
            aliases: Vec::new(),
            libs: Vec::new(),
            include_dirs: default_include_dirs(),
            lib_dirs: default_lib_dirs(),
            defines: Vec::new(),
            requires: Vec::new(),
        }
    }
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if manifest.package.name.trim().is_empty() {
            anyhow::bail!("manifest at {} has an empty package name", path.display());
        }
        manifest.package.version()?;

        for name in manifest.components.keys() {
            if name.trim().is_empty() || name.contains(char::is_whitespace) {
                anyhow::bail!(
                    "manifest at {} declares an invalid component name `{}`",
                    path.display(),
                    name
                );
            }
        }

        Ok(manifest)
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Get the package version.
    pub fn version(&self) -> Result<Version> {
        self.package.version()
    }
}

/// Generate a default Berth.toml for a new package.
pub fn generate_default_manifest(name: &str) -> String {
    format!(
        r#"[package]
name = "{name}"
version = "0.1.0"

[layout]
build = "build/{{build_type}}"

[cpp_info]
libs = ["{name}"]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_basic_manifest() {
        let content = r#"
[package]
name = "mylib"
version = "1.0.0"
"#;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);

        let manifest = Manifest::parse(content, &path).unwrap();
        assert_eq!(manifest.name(), "mylib");
        assert_eq!(manifest.version().unwrap(), Version::new(1, 0, 0));
        assert_eq!(manifest.layout, LayoutConfig::default());
        assert!(manifest.components.is_empty());
        assert_eq!(manifest.cpp_info.include_dirs, vec!["include"]);
    }

    #[test]
    fn test_parse_layout_and_components() {
        let content = r#"
[package]
name = "app"
version = "1.0.0"

[layout]
source = "my_src"
build = "{build_type}"
no_copy_source = true

[cmake]
target_name = "app"
aliases = ["App"]

[components.io]
libs = ["io"]

[components.core]
libs = ["core"]
aliases = ["core_alias"]
requires = ["io", "zlib::zlib"]
"#;
        let manifest = Manifest::parse(content, Path::new(MANIFEST_NAME)).unwrap();
        assert_eq!(manifest.layout.source.as_deref(), Some("my_src"));
        assert_eq!(manifest.layout.build.as_deref(), Some("{build_type}"));
        assert!(manifest.layout.no_copy_source);
        assert_eq!(manifest.cmake.aliases, vec!["App"]);

        let names: Vec<_> = manifest.components.keys().cloned().collect();
        assert_eq!(names, vec!["core", "io"]);
        assert_eq!(manifest.components["core"].requires, vec!["io", "zlib::zlib"]);
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let content = r#"
[package]
name = "app"
version = "one"
"#;
        assert!(Manifest::parse(content, Path::new(MANIFEST_NAME)).is_err());
    }

    #[test]
    fn test_generated_manifest_parses() {
        let content = generate_default_manifest("zlib");
        let manifest = Manifest::parse(&content, Path::new(MANIFEST_NAME)).unwrap();
        assert_eq!(manifest.name(), "zlib");
        assert_eq!(manifest.layout.build.as_deref(), Some("build/{build_type}"));
    }

    #[test]
    fn test_find_manifest_walks_up() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&manifest, generate_default_manifest("app")).unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_manifest(&nested).unwrap(), manifest);
    }
}
