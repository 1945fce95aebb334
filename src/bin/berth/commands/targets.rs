//! `berth targets` command

use anyhow::Result;

use crate::cli::TargetsArgs;
use crate::commands::{current_package, settings};
use berth::CMakeDeps;
use berth::util::GlobalContext;

pub fn execute(args: TargetsArgs, ctx: &GlobalContext) -> Result<()> {
    let (package, config) = current_package(ctx)?;
    let settings = settings(&config, None, &[])?;

    let root = package.root().to_path_buf();
    let deps = CMakeDeps::new(
        &package,
        &settings,
        &root,
        &root,
        args.module_mode || config.find_module_mode(),
    )?
    .with_message_mode(config.message_mode());

    print!("{}", deps.targets_file().contents);
    Ok(())
}
