//! Package layout - where a package's sources and build outputs live.
//!
//! Resolution runs in two stages:
//!
//! 1. [`plan_layout`] expands the declared folder expressions against the
//!    build [`Settings`] and joins them onto the package root. It never
//!    touches the filesystem.
//! 2. [`resolve_layout`] validates the plan on disk (the source folder must
//!    exist) and creates the build folder.
//!
//! The build subfolder is always relative to the package root, never to the
//! source subfolder, so a declared `source = "my_src"` and
//! `build = "{build_type}"` yield sibling folders `<root>/my_src` and
//! `<root>/Release`. Declared subfolders may not climb out of the root.
//!
//! A cache build that does not set `no_copy_source` copies the whole package
//! root into the build folder, so the source subfolder keeps its place next
//! to whatever else was exported: `<build>/my_src` beside `<build>/docs`.

use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::core::manifest::LayoutConfig;
use crate::core::settings::{ConfigurationError, Settings};
use crate::util::diagnostic::Diagnostic;

/// Default generators subfolder, relative to the build folder.
pub const DEFAULT_GENERATORS_FOLDER: &str = "generators";

/// Error while resolving a package layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("source folder does not exist: {}", path.display())]
    MissingSourceFolder { path: PathBuf },

    #[error("{kind} folder `{declared}` must be relative to the package root")]
    AbsoluteSubfolder { kind: &'static str, declared: String },

    #[error("{kind} folder `{declared}` leaves the package root")]
    EscapingSubfolder { kind: &'static str, declared: String },

    #[error("editable source folder must be an absolute path: {}", path.display())]
    RelativeSourceFolder { path: PathBuf },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to create build folder: {}", path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to make `{}` absolute", path.display())]
    Absolute {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LayoutError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LayoutError::MissingSourceFolder { path } => {
                Diagnostic::error(self.to_string())
                    .at(path)
                    .help("Check `source` in the [layout] section of Berth.toml")
                    .help("Make sure the exported sources or archive contain that folder")
            }
            LayoutError::EscapingSubfolder { .. } => Diagnostic::error(self.to_string())
                .help("Declare [layout] folders below the package root, without `..`"),
            LayoutError::Configuration(ConfigurationError::UnresolvedVariable {
                variable, ..
            }) => Diagnostic::error(self.to_string())
                .help(format!("Pass the setting explicitly: `-s {}=<value>`", variable)),
            _ => Diagnostic::error(self.to_string()),
        }
    }
}

/// How the package is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutMode {
    /// Build inside the package cache from exported sources.
    Cache { export_folder: PathBuf },

    /// Local build in a working directory, generated files go to `install_folder`.
    Local {
        working_dir: PathBuf,
        install_folder: PathBuf,
    },

    /// Editable package: the build folder is a user workspace.
    Editable {
        working_dir: PathBuf,
        source_folder: Option<PathBuf>,
    },
}

impl LayoutMode {
    /// The package root folder subfolders are resolved against.
    pub fn root(&self) -> &Path {
        match self {
            LayoutMode::Cache { export_folder } => export_folder,
            LayoutMode::Local { working_dir, .. } | LayoutMode::Editable { working_dir, .. } => {
                working_dir
            }
        }
    }

    /// Short name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            LayoutMode::Cache { .. } => "cache",
            LayoutMode::Local { .. } => "local",
            LayoutMode::Editable { .. } => "editable",
        }
    }
}

/// A planned copy of the package root into the build folder.
///
/// The build folder itself is never part of the copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCopy {
    /// Package root
    pub from: PathBuf,
    /// Build folder
    pub to: PathBuf,
    /// Source folder relative to the root, empty when the root holds the sources
    pub source_subfolder: PathBuf,
}

impl SourceCopy {
    /// Where the source folder ends up inside the copy.
    pub fn sources(&self) -> PathBuf {
        if self.source_subfolder.as_os_str().is_empty() {
            return self.to.clone();
        }
        self.to.join(&self.source_subfolder)
    }
}

/// Resolved folders of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageLayout {
    /// Package root
    pub root: PathBuf,

    /// Where the manifest and exported sources were materialized (cache mode)
    pub export_folder: Option<PathBuf>,

    /// Buildable sources
    pub source_folder: PathBuf,

    /// Build output
    pub build_folder: PathBuf,

    /// Generated integration files
    pub generators_folder: PathBuf,

    /// Sources are referenced in place and must never be written to
    pub no_copy_source: bool,

    /// Copy to perform before building, if any
    pub source_copy: Option<SourceCopy>,
}

impl PackageLayout {
    /// Folder the build step reads sources from.
    pub fn build_sources(&self) -> PathBuf {
        match &self.source_copy {
            Some(copy) => copy.sources(),
            None => self.source_folder.clone(),
        }
    }
}

/// Compute the layout without touching the filesystem.
pub fn plan_layout(
    declared: &LayoutConfig,
    settings: &Settings,
    mode: &LayoutMode,
) -> Result<PackageLayout, LayoutError> {
    let root = absolute(mode.root())?;

    let source_folder = match (mode, subfolder(declared.source.as_deref(), "source")?) {
        (LayoutMode::Editable { source_folder: Some(path), .. }, _) => {
            if !path.is_absolute() {
                return Err(LayoutError::RelativeSourceFolder { path: path.clone() });
            }
            path.clone()
        }
        (_, Some(sub)) => root.join(sub),
        (_, None) => root.clone(),
    };

    let build_folder = match declared.build.as_deref() {
        Some(expr) => {
            let expanded = settings.expand(expr)?;
            match subfolder(Some(&expanded), "build")? {
                Some(sub) => root.join(sub),
                None => root.clone(),
            }
        }
        None => source_folder.clone(),
    };

    let generators_folder = match mode {
        LayoutMode::Local { install_folder, .. } => absolute(install_folder)?,
        _ => {
            let expr = declared
                .generators
                .as_deref()
                .unwrap_or(DEFAULT_GENERATORS_FOLDER);
            let expanded = settings.expand(expr)?;
            match subfolder(Some(&expanded), "generators")? {
                Some(sub) => build_folder.join(sub),
                None => build_folder.clone(),
            }
        }
    };

    let source_copy = plan_source_copy(
        mode,
        declared.no_copy_source,
        &root,
        &source_folder,
        &build_folder,
    );

    Ok(PackageLayout {
        export_folder: match mode {
            LayoutMode::Cache { .. } => Some(root.clone()),
            _ => None,
        },
        root,
        source_folder,
        build_folder,
        generators_folder,
        no_copy_source: declared.no_copy_source,
        source_copy,
    })
}

/// Compute the layout, check the source folder exists and create the build folder.
pub fn resolve_layout(
    declared: &LayoutConfig,
    settings: &Settings,
    mode: &LayoutMode,
) -> Result<PackageLayout, LayoutError> {
    let layout = plan_layout(declared, settings, mode)?;

    if !layout.source_folder.is_dir() {
        return Err(LayoutError::MissingSourceFolder {
            path: layout.source_folder,
        });
    }

    std::fs::create_dir_all(&layout.build_folder).map_err(|source| LayoutError::CreateFolder {
        path: layout.build_folder.clone(),
        source,
    })?;

    tracing::debug!(
        "Resolved {} layout: source={}, build={}",
        mode.name(),
        layout.source_folder.display(),
        layout.build_folder.display()
    );

    Ok(layout)
}

/// Sources are copied only for cache builds that did not opt out, and only
/// when the build folder does not already contain them.
fn plan_source_copy(
    mode: &LayoutMode,
    no_copy_source: bool,
    root: &Path,
    source_folder: &Path,
    build_folder: &Path,
) -> Option<SourceCopy> {
    if no_copy_source || !matches!(mode, LayoutMode::Cache { .. }) {
        return None;
    }
    if source_folder.starts_with(build_folder) {
        return None;
    }
    let source_subfolder = source_folder.strip_prefix(root).ok()?;

    Some(SourceCopy {
        from: root.to_path_buf(),
        to: build_folder.to_path_buf(),
        source_subfolder: source_subfolder.to_path_buf(),
    })
}

/// Normalize a declared subfolder. Empty and `.` mean "the root itself".
fn subfolder(declared: Option<&str>, kind: &'static str) -> Result<Option<PathBuf>, LayoutError> {
    let Some(declared) = declared.map(str::trim) else {
        return Ok(None);
    };
    if declared.is_empty() || declared == "." {
        return Ok(None);
    }

    let path = PathBuf::from(declared);
    if path.is_absolute() || path.has_root() {
        return Err(LayoutError::AbsoluteSubfolder {
            kind,
            declared: declared.to_string(),
        });
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(LayoutError::EscapingSubfolder {
            kind,
            declared: declared.to_string(),
        });
    }
    Ok(Some(path))
}

fn absolute(path: &Path) -> Result<PathBuf, LayoutError> {
    std::path::absolute(path).map_err(|source| LayoutError::Absolute {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn declared(source: Option<&str>, build: Option<&str>, no_copy_source: bool) -> LayoutConfig {
        LayoutConfig {
            source: source.map(String::from),
            build: build.map(String::from),
            generators: None,
            no_copy_source,
        }
    }

    fn release() -> Settings {
        Settings::new().with("build_type", "Release")
    }

    fn cache(root: &Path) -> LayoutMode {
        LayoutMode::Cache {
            export_folder: root.to_path_buf(),
        }
    }

    #[test]
    fn test_source_subfolder_with_build_type_folder() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("my_src")).unwrap();

        let layout = resolve_layout(
            &declared(Some("my_src"), Some("{build_type}"), false),
            &release(),
            &cache(tmp.path()),
        )
        .unwrap();

        assert!(layout.source_folder.ends_with("my_src"));
        assert!(layout.build_folder.ends_with("Release"));
        assert!(layout.build_folder.is_dir());

        // Siblings, not nested
        assert_eq!(layout.build_folder.parent(), layout.source_folder.parent());
        assert!(!layout.build_folder.starts_with(&layout.source_folder));

        // Artifacts written to the build folder land under <root>/Release
        std::fs::write(layout.build_folder.join("my_app"), "bin").unwrap();
        assert!(tmp.path().join("Release").join("my_app").exists());
    }

    #[test]
    fn test_no_source_subfolder_uses_export_folder() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("CMakeLists.txt"), "").unwrap();

        let layout =
            resolve_layout(&declared(None, None, false), &release(), &cache(tmp.path())).unwrap();

        assert_eq!(Some(&layout.source_folder), layout.export_folder.as_ref());
        assert_eq!(layout.build_folder, layout.source_folder);
        assert!(layout.source_copy.is_none());
    }

    #[test]
    fn test_local_mode_without_subfolder_uses_working_dir() {
        let tmp = TempDir::new().unwrap();
        let mode = LayoutMode::Local {
            working_dir: tmp.path().to_path_buf(),
            install_folder: tmp.path().join("install"),
        };

        let layout = resolve_layout(&declared(None, Some("{build_type}"), false), &release(), &mode)
            .unwrap();

        assert_eq!(layout.source_folder, tmp.path());
        assert_eq!(layout.build_folder, tmp.path().join("Release"));
        assert_eq!(layout.generators_folder, tmp.path().join("install"));
        assert!(layout.export_folder.is_none());
        assert!(layout.source_copy.is_none());
    }

    #[test]
    fn test_missing_source_subfolder_names_the_path() {
        let tmp = TempDir::new().unwrap();

        let err = resolve_layout(
            &declared(Some("my_src"), None, false),
            &release(),
            &cache(tmp.path()),
        )
        .unwrap_err();

        match err {
            LayoutError::MissingSourceFolder { path } => assert!(path.ends_with("my_src")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_variable_is_configuration_error() {
        let tmp = TempDir::new().unwrap();

        let err = resolve_layout(
            &declared(None, Some("build_{compiler}"), false),
            &release(),
            &cache(tmp.path()),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LayoutError::Configuration(ConfigurationError::UnresolvedVariable { .. })
        ));
        assert!(err.to_diagnostic().format(false).contains("-s compiler=<value>"));
        assert!(!tmp.path().join("build_").exists());
    }

    #[test]
    fn test_plan_does_not_touch_disk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("does-not-exist");

        let layout = plan_layout(
            &declared(Some("src"), Some("build_{build_type}"), true),
            &release(),
            &cache(&root),
        )
        .unwrap();

        assert_eq!(layout.source_folder, root.join("src"));
        assert_eq!(layout.build_folder, root.join("build_Release"));
        assert_eq!(
            layout.generators_folder,
            root.join("build_Release").join(DEFAULT_GENERATORS_FOLDER)
        );
        assert!(!root.exists());
    }

    #[test]
    fn test_copy_planned_only_for_cache_builds() {
        let tmp = TempDir::new().unwrap();
        let decl = declared(Some("my_src"), Some("{build_type}"), false);

        let layout = plan_layout(&decl, &release(), &cache(tmp.path())).unwrap();
        let copy = layout.source_copy.clone().unwrap();
        assert_eq!(copy.from, layout.root);
        assert_eq!(copy.to, layout.build_folder);
        assert_eq!(copy.source_subfolder, PathBuf::from("my_src"));
        assert_eq!(layout.build_sources(), layout.build_folder.join("my_src"));

        let editable = LayoutMode::Editable {
            working_dir: tmp.path().to_path_buf(),
            source_folder: None,
        };
        let layout = plan_layout(&decl, &release(), &editable).unwrap();
        assert!(layout.source_copy.is_none());
        assert_eq!(layout.build_sources(), layout.source_folder);
    }

    #[test]
    fn test_no_copy_source_never_plans_copy() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("my_src")).unwrap();

        let layout = resolve_layout(
            &declared(Some("my_src"), Some("{build_type}"), true),
            &release(),
            &cache(tmp.path()),
        )
        .unwrap();

        assert!(layout.no_copy_source);
        assert!(layout.source_copy.is_none());
        assert_eq!(layout.build_sources(), layout.source_folder);
    }

    #[test]
    fn test_root_sources_copied_into_build_folder() {
        let tmp = TempDir::new().unwrap();
        let layout = plan_layout(
            &declared(None, Some("build"), false),
            &release(),
            &cache(tmp.path()),
        )
        .unwrap();

        let copy = layout.source_copy.clone().unwrap();
        assert_eq!(copy.from, tmp.path());
        assert_eq!(copy.source_subfolder, PathBuf::new());
        assert_eq!(layout.build_sources(), tmp.path().join("build"));
    }

    #[test]
    fn test_no_copy_when_sources_inside_build_folder() {
        let tmp = TempDir::new().unwrap();
        let layout = plan_layout(
            &declared(Some("build/src"), Some("build"), false),
            &release(),
            &cache(tmp.path()),
        )
        .unwrap();

        assert!(layout.source_copy.is_none());
        assert_eq!(layout.build_sources(), tmp.path().join("build/src"));
    }

    #[test]
    fn test_editable_explicit_source_folder() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();

        let mode = LayoutMode::Editable {
            working_dir: tmp.path().to_path_buf(),
            source_folder: Some(elsewhere.path().to_path_buf()),
        };
        let layout =
            resolve_layout(&declared(Some("ignored"), Some("out"), false), &release(), &mode)
                .unwrap();

        assert_eq!(layout.source_folder, elsewhere.path());
        assert_eq!(layout.build_folder, tmp.path().join("out"));

        let relative = LayoutMode::Editable {
            working_dir: tmp.path().to_path_buf(),
            source_folder: Some(PathBuf::from("relative/src")),
        };
        assert!(matches!(
            plan_layout(&declared(None, None, false), &release(), &relative),
            Err(LayoutError::RelativeSourceFolder { .. })
        ));
    }

    #[test]
    fn test_absolute_subfolder_rejected() {
        let tmp = TempDir::new().unwrap();
        let absolute = tmp.path().join("abs").display().to_string();

        assert!(matches!(
            plan_layout(&declared(Some(&absolute), None, false), &release(), &cache(tmp.path())),
            Err(LayoutError::AbsoluteSubfolder { kind: "source", .. })
        ));
    }

    #[test]
    fn test_parent_dir_subfolder_rejected() {
        let tmp = TempDir::new().unwrap();
        let export = tmp.path().join("export");
        std::fs::create_dir(&export).unwrap();
        std::fs::create_dir(tmp.path().join("outside")).unwrap();

        let err = resolve_layout(
            &declared(Some("../outside"), Some("../../escaped_build"), false),
            &release(),
            &cache(&export),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::EscapingSubfolder { kind: "source", .. }
        ));
        assert!(err.to_string().contains("`../outside`"));

        let err = resolve_layout(
            &declared(None, Some("out/../../escaped_build"), false),
            &release(),
            &cache(&export),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::EscapingSubfolder { kind: "build", .. }));
        assert!(!tmp.path().join("escaped_build").exists());
        assert!(!export.join("out").exists());
    }

    #[test]
    fn test_expanded_build_folder_cannot_escape() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::new().with("build_type", "..");

        assert!(matches!(
            plan_layout(&declared(None, Some("{build_type}"), false), &settings, &cache(tmp.path())),
            Err(LayoutError::EscapingSubfolder { kind: "build", .. })
        ));
    }

    #[test]
    fn test_resolve_does_not_create_source_folder() {
        let tmp = TempDir::new().unwrap();
        let _ = resolve_layout(
            &declared(Some("my_src"), Some("{build_type}"), true),
            &release(),
            &cache(tmp.path()),
        );

        assert!(!tmp.path().join("my_src").exists());
        assert!(!tmp.path().join("Release").exists());
    }
}
