//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Berth - package layout and CMake target generation for C/C++
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a Berth.toml in an existing directory
    Init(InitArgs),

    /// Resolve the source, build and generators folders of the current package
    Layout(LayoutArgs),

    /// Write the CMake files of the current package
    Install(InstallArgs),

    /// Print the targets file of the current package
    Targets(TargetsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Package name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Build from exported sources in a package cache
    Cache,
    /// Build in the package's own directory
    Local,
    /// Build in a user workspace
    Editable,
}

#[derive(Args)]
pub struct LayoutArgs {
    /// How the package is being built
    #[arg(long, value_enum, default_value = "local")]
    pub mode: ModeArg,

    /// Export folder holding Berth.toml and the sources (cache mode)
    #[arg(long)]
    pub export_folder: Option<PathBuf>,

    /// Where generated files go (local mode)
    #[arg(long)]
    pub install_folder: Option<PathBuf>,

    /// Absolute source folder overriding the declared one (editable mode)
    #[arg(long)]
    pub source_folder: Option<PathBuf>,

    /// Setting assignment, e.g. `-s build_type=Debug`
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Local .tar.gz with the package sources, extracted before resolving
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Leading directory to strip from archive entries
    #[arg(long, requires = "archive")]
    pub strip_prefix: Option<String>,

    /// Copy the sources into the build folder when the layout plans it
    #[arg(long)]
    pub stage: bool,

    /// Print the resolved layout as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Folder to write the generated files to
    #[arg(long)]
    pub install_folder: Option<PathBuf>,

    /// Build type of the configuration (Release, Debug, ...)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Generate Find<name>.cmake modules instead of config files
    #[arg(long)]
    pub module_mode: bool,

    /// Folder holding the package's headers and libraries (defaults to the package root)
    #[arg(long)]
    pub package_folder: Option<PathBuf>,

    /// Setting assignment, e.g. `-s arch=armv8`
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Suppress informational messages in the generated files
    #[arg(long)]
    pub quiet_messages: bool,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Print the module-mode targets file
    #[arg(long)]
    pub module_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_args() {
        let cli = Cli::parse_from([
            "berth",
            "layout",
            "--mode",
            "cache",
            "--export-folder",
            "/cache/app",
            "-s",
            "build_type=Debug",
            "--stage",
        ]);

        let Commands::Layout(args) = cli.command else {
            panic!("expected layout command");
        };
        assert_eq!(args.mode, ModeArg::Cache);
        assert_eq!(args.export_folder, Some(PathBuf::from("/cache/app")));
        assert_eq!(args.settings, vec!["build_type=Debug"]);
        assert!(args.stage);
        assert!(!args.json);
    }

    #[test]
    fn test_layout_defaults_to_local() {
        let cli = Cli::parse_from(["berth", "layout"]);
        let Commands::Layout(args) = cli.command else {
            panic!("expected layout command");
        };
        assert_eq!(args.mode, ModeArg::Local);
    }

    #[test]
    fn test_strip_prefix_requires_archive() {
        assert!(Cli::try_parse_from(["berth", "layout", "--strip-prefix", "app-1.0"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["berth", "targets", "--module-mode", "--verbose", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::Targets(TargetsArgs { module_mode: true })));
    }
}
