//! Source archive extraction.

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

/// Extract a `.tar.gz` archive into `dest`.
///
/// With `strip_prefix`, a leading directory of that name is removed from
/// every entry (the usual `name-1.0/` top folder of source releases).
/// Returns the number of files extracted.
pub fn extract_tarball(data: &[u8], dest: &Path, strip_prefix: Option<&str>) -> Result<usize> {
    let mut archive = Archive::new(GzDecoder::new(Cursor::new(data)));

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    let mut extracted = 0;
    for entry in archive.entries().context("failed to read tarball entries")? {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry.path().context("failed to get entry path")?.into_owned();

        let relative = match strip_prefix {
            Some(prefix) => match strip_leading(&entry_path, prefix) {
                Some(rel) => rel,
                None => continue,
            },
            None => entry_path.clone(),
        };

        if !stays_inside(&relative) {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }

        let output_path = dest.join(&relative);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        let is_file = entry.header().entry_type().is_file();
        entry
            .unpack(&output_path)
            .with_context(|| format!("failed to extract: {}", output_path.display()))?;
        if is_file {
            extracted += 1;
        }
    }

    tracing::debug!("extracted {} files into {}", extracted, dest.display());
    Ok(extracted)
}

/// Remove `prefix` from the front of `path`. `None` for the prefix
/// directory itself, which has nothing left to extract.
fn strip_leading(path: &Path, prefix: &str) -> Option<PathBuf> {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Ok(rest) if rest.as_os_str().is_empty() => None,
        Ok(rest) => Some(rest.to_path_buf()),
        Err(_) => Some(path.to_path_buf()),
    }
}

fn stays_inside(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extract_with_prefix() {
        let tmp = TempDir::new().unwrap();
        let data = tarball(&[
            ("app-1.0/CMakeLists.txt", "project(app)"),
            ("app-1.0/src/app.c", "int app;"),
        ]);

        let count = extract_tarball(&data, tmp.path(), Some("app-1.0")).unwrap();

        assert_eq!(count, 2);
        assert!(tmp.path().join("CMakeLists.txt").exists());
        assert!(tmp.path().join("src/app.c").exists());
        assert!(!tmp.path().join("app-1.0").exists());
    }

    #[test]
    fn test_extract_without_prefix() {
        let tmp = TempDir::new().unwrap();
        let data = tarball(&[("app-1.0/README", "hi")]);

        extract_tarball(&data, tmp.path(), None).unwrap();
        assert!(tmp.path().join("app-1.0/README").exists());
    }

    #[test]
    fn test_entry_paths_are_checked() {
        assert!(stays_inside(Path::new("src/app.c")));
        assert!(!stays_inside(Path::new("../evil")));
        assert!(!stays_inside(Path::new("/etc/passwd")));
        assert_eq!(strip_leading(Path::new("app-1.0"), "app-1.0/"), None);
    }
}
