//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use walkdir::WalkDir;

/// Recursively copy `src` into `dst`, skipping everything under `exclude`.
///
/// Returns the number of files copied.
pub fn copy_dir_filtered(src: &Path, dst: &Path, exclude: Option<&Path>) -> Result<usize> {
    ensure_dir(dst)?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| match exclude {
            Some(excluded) => !entry.path().starts_with(excluded),
            None => true,
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to read directory: {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("unexpected path outside {}", src.display()))?;
        let dst_path = dst.join(rel);

        if entry.file_type().is_dir() {
            ensure_dir(&dst_path)?;
        } else {
            if let Some(parent) = dst_path.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(entry.path(), &dst_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    dst_path.display()
                )
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Write `contents` unless the file already holds exactly that.
///
/// Returns `true` when the file was written.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == contents {
            return Ok(false);
        }
    }
    write_string(path, contents)?;
    Ok(true)
}

/// Find files in `base` whose names match `pattern`.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = base.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut results = Vec::new();
    for entry in glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => results.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("glob error: {}", e),
        }
    }

    results.sort();
    Ok(results)
}

/// Get the relative path from `base` to `path`, if one exists.
pub fn relative_path(base: &Path, path: &Path) -> Option<PathBuf> {
    pathdiff::diff_paths(path, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("app-release-x86_64-data.cmake"), "").unwrap();
        fs::write(tmp.path().join("app-debug-x86_64-data.cmake"), "").unwrap();
        fs::write(tmp.path().join("appTargets.cmake"), "").unwrap();

        let files = glob_files(tmp.path(), "app-*-data.cmake").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("app-debug-x86_64-data.cmake"));
    }

    #[test]
    fn test_copy_dir_filtered_skips_excluded() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("pkg");
        let build = src.join("build");
        fs::create_dir_all(src.join("src")).unwrap();
        fs::create_dir_all(&build).unwrap();
        fs::write(src.join("CMakeLists.txt"), "project(app)").unwrap();
        fs::write(src.join("src/app.c"), "int app;").unwrap();
        fs::write(build.join("stale.o"), "").unwrap();

        let copied = copy_dir_filtered(&src, &build, Some(&build)).unwrap();

        assert_eq!(copied, 2);
        assert!(build.join("CMakeLists.txt").exists());
        assert!(build.join("src/app.c").exists());
        assert!(!build.join("build").exists());
    }

    #[test]
    fn test_write_if_changed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/file.cmake");

        assert!(write_if_changed(&path, "a").unwrap());
        assert!(!write_if_changed(&path, "a").unwrap());
        assert!(write_if_changed(&path, "b").unwrap());
        assert_eq!(read_to_string(&path).unwrap(), "b");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/c/d")),
            Some(PathBuf::from("../c/d"))
        );
        assert_eq!(relative_path(Path::new("/a"), Path::new("/a")), Some(PathBuf::new()));
    }
}
