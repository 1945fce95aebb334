//! Command implementations

pub mod init;
pub mod install;
pub mod layout;
pub mod targets;

use anyhow::Result;

use berth::core::Settings;
use berth::util::{Config, GlobalContext};
use berth::Package;

/// Load the package governing the current directory with its merged config.
pub(crate) fn current_package(ctx: &GlobalContext) -> Result<(Package, Config)> {
    let manifest_path = ctx.find_manifest()?;
    let package = Package::load(&manifest_path)?;
    let config = ctx.load_config(package.root());
    Ok((package, config))
}

/// Host settings, then the configured or requested build type, then `-s` assignments.
pub(crate) fn settings(config: &Config, build_type: Option<&str>, assignments: &[String]) -> Result<Settings> {
    let mut settings = Settings::host();
    if let Some(build_type) = build_type.or(config.build.build_type.as_deref()) {
        settings.set("build_type", build_type);
    }
    for assignment in assignments {
        settings.apply_assignment(assignment)?;
    }
    Ok(settings)
}
