//! Berth - package folder layout and CMake target generation for C/C++
//!
//! This crate resolves where a package's sources and build outputs live and
//! generates the CMake files that expose the package's libraries as
//! imported targets.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use crate::builder::cmakedeps::CMakeDeps;
pub use crate::core::{
    layout::{LayoutMode, PackageLayout},
    manifest::Manifest,
    package::Package,
    settings::Settings,
};
pub use crate::util::context::GlobalContext;
