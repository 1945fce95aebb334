//! Build-system integration.
//!
//! Berth does not compile anything itself; this module generates the files a
//! consuming CMake project loads through `find_package()`.

pub mod cmakedeps;

pub use cmakedeps::{CMakeDeps, GeneratedFile, MessageMode};
