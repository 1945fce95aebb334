//! Implementation of `berth layout`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::layout::{resolve_layout, LayoutMode, PackageLayout};
use crate::core::manifest::MANIFEST_NAME;
use crate::core::{Package, Settings};
use crate::util::archive::extract_tarball;
use crate::util::fs::copy_dir_filtered;

/// Options for resolving a package layout.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub mode: LayoutMode,

    pub settings: Settings,

    /// Local `.tar.gz` with the package sources, extracted into the package
    /// root before resolution
    pub archive: Option<PathBuf>,

    /// Leading directory to drop from archive entries
    pub strip_prefix: Option<String>,

    /// Perform the planned source copy
    pub stage: bool,
}

/// Outcome of [`layout`].
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub package: Package,
    pub layout: PackageLayout,
    /// Number of files copied into the build folder, when staged.
    pub staged: Option<usize>,
}

/// Resolve the folders of the package whose manifest sits in the mode's root.
pub fn layout(opts: &LayoutOptions) -> Result<LayoutResult> {
    let root = opts.mode.root();

    if let Some(archive) = &opts.archive {
        unpack_sources(archive, root, opts.strip_prefix.as_deref())?;
    }

    let package = Package::load(&root.join(MANIFEST_NAME))?;
    let layout = resolve_layout(package.layout(), &opts.settings, &opts.mode)?;

    tracing::info!(
        "{} {} ({} layout)",
        package.name(),
        package.version(),
        opts.mode.name()
    );

    let staged = if opts.stage {
        Some(stage_sources(&layout)?)
    } else {
        None
    };

    Ok(LayoutResult {
        package,
        layout,
        staged,
    })
}

/// Carry out the layout's planned copy of the package root into the build
/// folder. Nothing is written to the source folder; without a plan this does
/// nothing.
pub fn stage_sources(layout: &PackageLayout) -> Result<usize> {
    let Some(copy) = &layout.source_copy else {
        tracing::debug!("no source copy planned");
        return Ok(0);
    };

    let copied = copy_dir_filtered(&copy.from, &copy.to, Some(&copy.to))
        .with_context(|| format!("failed to copy sources into {}", copy.to.display()))?;
    tracing::info!("Copied {} source files to {}", copied, copy.to.display());
    Ok(copied)
}

fn unpack_sources(archive: &Path, dest: &Path, strip_prefix: Option<&str>) -> Result<()> {
    let data = std::fs::read(archive)
        .with_context(|| format!("failed to read archive: {}", archive.display()))?;
    let count = extract_tarball(&data, dest, strip_prefix)
        .with_context(|| format!("failed to extract {}", archive.display()))?;
    tracing::info!("Extracted {} files from {}", count, archive.display());
    Ok(())
}
