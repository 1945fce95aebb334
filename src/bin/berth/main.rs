//! Berth CLI - package layout and CMake target generation for C/C++

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use berth::core::layout::LayoutError;
use berth::core::manifest::ManifestError;
use berth::util::diagnostic::emit;
use berth::util::GlobalContext;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let mut ctx = match GlobalContext::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    };
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    if let Err(e) = run(cli.command, &ctx) {
        if let Some(err) = e.downcast_ref::<LayoutError>() {
            emit(&err.to_diagnostic(), ctx.color());
        } else if let Some(err) = e.downcast_ref::<ManifestError>() {
            emit(&err.to_diagnostic(), ctx.color());
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, ctx: &GlobalContext) -> Result<()> {
    // Set up logging
    let filter = if ctx.is_verbose() {
        EnvFilter::new("berth=debug")
    } else {
        EnvFilter::new("berth=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ctx.color())
        .with_target(false)
        .without_time()
        .init();

    match command {
        Commands::Init(args) => commands::init::execute(args, ctx),
        Commands::Layout(args) => commands::layout::execute(args, ctx),
        Commands::Install(args) => commands::install::execute(args, ctx),
        Commands::Targets(args) => commands::targets::execute(args, ctx),
    }
}
