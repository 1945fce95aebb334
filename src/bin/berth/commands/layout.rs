//! `berth layout` command

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{LayoutArgs, ModeArg};
use crate::commands::settings;
use berth::core::LayoutMode;
use berth::ops::{layout, LayoutOptions};
use berth::util::GlobalContext;

pub fn execute(args: LayoutArgs, ctx: &GlobalContext) -> Result<()> {

    // Cache mode may start from an empty export folder filled by --archive,
    // so only the other modes need a manifest above the current directory.
    let (root, config) = match (&args.mode, &args.export_folder) {
        (ModeArg::Cache, Some(export)) => (export.clone(), ctx.load_config(export)),
        _ => {
            let manifest_path = ctx.find_manifest()?;
            let root = manifest_path
                .parent()
                .map(PathBuf::from)
                .context("manifest has no parent directory")?;
            let config = ctx.load_config(&root);
            (root, config)
        }
    };

    let mode = match args.mode {
        ModeArg::Cache => LayoutMode::Cache {
            export_folder: root,
        },
        ModeArg::Local => {
            let install_folder = args
                .install_folder
                .or(config.build.install_folder.clone())
                .map(|folder| root.join(folder))
                .unwrap_or_else(|| ctx.cwd().to_path_buf());
            LayoutMode::Local {
                working_dir: root,
                install_folder,
            }
        }
        ModeArg::Editable => LayoutMode::Editable {
            working_dir: root,
            source_folder: args.source_folder,
        },
    };

    let opts = LayoutOptions {
        mode,
        settings: settings(&config, None, &args.settings)?,
        archive: args.archive,
        strip_prefix: args.strip_prefix,
        stage: args.stage,
    };

    let result = layout(&opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.layout)?);
    } else {
        println!("source_folder: {}", result.layout.source_folder.display());
        println!("build_folder: {}", result.layout.build_folder.display());
        println!("generators_folder: {}", result.layout.generators_folder.display());
        if let Some(copy) = &result.layout.source_copy {
            println!("source_copy: {} -> {}", copy.from.display(), copy.to.display());
        }
        println!("build_sources: {}", result.layout.build_sources().display());
    }

    if let Some(count) = result.staged {
        eprintln!("{:>12} {} source files", "Staged", count);
    }

    Ok(())
}
