//! `berth init` command

use anyhow::Result;

use crate::cli::InitArgs;
use berth::ops::init_package;
use berth::util::GlobalContext;

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = args.path.unwrap_or_else(|| ctx.cwd().to_path_buf());

    let manifest_path = init_package(&path, args.name.as_deref())?;
    eprintln!("{:>12} {}", "Created", manifest_path.display());

    Ok(())
}
