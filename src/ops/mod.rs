//! High-level operations.
//!
//! This module contains the implementation of Berth commands.

pub mod berth_init;
pub mod berth_install;
pub mod berth_layout;

pub use berth_init::init_package;
pub use berth_install::{install, installed_configurations, InstallOptions, InstallResult};
pub use berth_layout::{layout, stage_sources, LayoutOptions, LayoutResult};
