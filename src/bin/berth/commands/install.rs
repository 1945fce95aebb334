//! `berth install` command

use anyhow::Result;

use crate::cli::InstallArgs;
use crate::commands::{current_package, settings};
use berth::builder::MessageMode;
use berth::core::{plan_layout, LayoutMode};
use berth::ops::{install, InstallOptions};
use berth::util::GlobalContext;

pub fn execute(args: InstallArgs, ctx: &GlobalContext) -> Result<()> {
    let (package, config) = current_package(ctx)?;
    let root = package.root().to_path_buf();

    let settings = settings(&config, args.build_type.as_deref(), &args.settings)?;

    // CLI > config > the layout's generators folder
    let install_folder = match args.install_folder.or(config.build.install_folder.clone()) {
        Some(folder) => root.join(folder),
        None => {
            let mode = LayoutMode::Editable {
                working_dir: root.clone(),
                source_folder: None,
            };
            plan_layout(package.layout(), &settings, &mode)?.generators_folder
        }
    };

    let message_mode = if args.quiet_messages {
        MessageMode::Quiet
    } else {
        config.message_mode()
    };

    let opts = InstallOptions {
        settings,
        install_folder: install_folder.clone(),
        package_folder: args
            .package_folder
            .map(|folder| root.join(folder))
            .unwrap_or(root),
        module_mode: args.module_mode || config.find_module_mode(),
        message_mode,
    };

    let result = install(&package, &opts)?;

    for path in &result.written {
        eprintln!("{:>12} {}", "Generated", path.display());
    }
    eprintln!(
        "{:>12} {} file(s) in {} ({} unchanged)",
        "Finished",
        result.written.len() + result.unchanged.len(),
        install_folder.display(),
        result.unchanged.len()
    );

    Ok(())
}
