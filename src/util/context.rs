//! Global context for Berth operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::util::config::{self, load_config, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Berth data (~/.berth/)
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(".berth"));

        Ok(GlobalContext {
            cwd,
            home,
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Berth home directory (~/.berth/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find the Berth.toml governing the current directory.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest(&self.cwd)
    }

    /// Load the merged global and project configuration for `project_root`.
    pub fn load_config(&self, project_root: &Path) -> Config {
        load_config(&self.config_path(), &config::project_config_path(project_root))
    }
}
