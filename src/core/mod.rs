//! Core data structures for Berth.
//!
//! - Manifests and packages
//! - Settings and expression expansion
//! - Folder layout resolution
//! - Library information (`cpp_info`) consumed by the generators

pub mod cpp_info;
pub mod layout;
pub mod manifest;
pub mod package;
pub mod settings;

pub use cpp_info::{ComponentInfo, CppInfo};
pub use layout::{plan_layout, resolve_layout, LayoutError, LayoutMode, PackageLayout};
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use package::Package;
pub use settings::{ConfigurationError, Settings};
