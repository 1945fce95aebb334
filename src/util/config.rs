//! Configuration file support for Berth.
//!
//! Berth supports two configuration file locations:
//! - Global: `~/.berth/config.toml` - User-wide defaults
//! - Project: `.berth/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::cmakedeps::MessageMode;

/// Berth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generated CMake files
    pub cmake: CMakeSettings,

    /// Build defaults
    pub build: BuildConfig,
}

/// Settings for the generated CMake files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CMakeSettings {
    /// Generate `Find<name>.cmake` modules instead of config files
    pub find_module_mode: Option<bool>,

    /// Default message mode of the targets file (status, quiet)
    pub message_mode: Option<MessageMode>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default build type (Release, Debug, ...)
    pub build_type: Option<String>,

    /// Default install folder for generated files, relative to the package
    pub install_folder: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.cmake.find_module_mode.is_some() {
            self.cmake.find_module_mode = other.cmake.find_module_mode;
        }
        if other.cmake.message_mode.is_some() {
            self.cmake.message_mode = other.cmake.message_mode;
        }

        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.install_folder.is_some() {
            self.build.install_folder = other.build.install_folder;
        }
    }

    pub fn find_module_mode(&self) -> bool {
        self.cmake.find_module_mode.unwrap_or(false)
    }

    pub fn message_mode(&self) -> MessageMode {
        self.cmake.message_mode.unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/config.toml)
/// 2. Global config (~/.berth/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }
    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global berth config directory (~/.berth).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".berth"))
}

/// Get the project config path (.berth/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".berth").join("config.toml")
}
