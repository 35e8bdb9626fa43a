// Tarball extraction for installers that ship as `.tar.gz` instead of a distro package
// (Quarto on RHEL-family hosts).

use crate::errors::WbiError;
use crate::log_debug;
use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use tar::Archive;

/// Extracts a gzipped tarball into `dest`, dropping the archive's top-level directory
/// (the equivalent of `tar -xzf src -C dest --strip-components=1`).
///
/// Entries whose remaining path would escape `dest` are skipped.
pub fn extract_tar_gz_stripped(src: &Path, dest: &Path) -> Result<(), WbiError> {
    log_debug!(
        "[Compression] Extracting {} into {}",
        src.display().to_string().blue(),
        dest.display().to_string().cyan()
    );

    fs::create_dir_all(dest).map_err(|e| WbiError::io("creating", dest, e))?;

    let tar_gz = File::open(src).map_err(|e| WbiError::io("opening", src, e))?;
    let mut archive = Archive::new(GzDecoder::new(tar_gz));
    let entries = archive
        .entries()
        .map_err(|e| WbiError::io("reading", src, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| WbiError::io("reading", src, e))?;
        let original = entry
            .path()
            .map_err(|e| WbiError::io("reading", src, e))?
            .into_owned();

        let Some(relative) = strip_first_component(&original) else {
            continue;
        };
        let target = dest.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| WbiError::io("creating", parent, e))?;
        }
        entry
            .unpack(&target)
            .map_err(|e| WbiError::io("extracting", &target, e))?;
    }

    log_debug!("[Compression] Extracted {}", src.display());
    Ok(())
}

/// Drops the leading directory of an archive path. Returns `None` for the top-level
/// directory itself and for anything that is not a plain relative path.
fn strip_first_component(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest: PathBuf = components.collect();

    let plain = rest
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if rest.as_os_str().is_empty() || !plain {
        return None;
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn build_tarball(path: &Path) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let body = b"#!/bin/sh\necho quarto\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "quarto-1.3.450/bin/quarto", &body[..])
            .unwrap();

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn strips_the_top_level_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tarball = dir.path().join("quarto.tar.gz");
        build_tarball(&tarball);

        let dest = dir.path().join("opt/quarto/1.3.450");
        extract_tar_gz_stripped(&tarball, &dest).unwrap();

        let binary = dest.join("bin/quarto");
        assert!(binary.is_file());
        assert!(!dest.join("quarto-1.3.450").exists());
    }

    #[test]
    fn strip_first_component_rejects_escapes() {
        assert_eq!(
            strip_first_component(Path::new("quarto-1.3/bin/quarto")),
            Some(PathBuf::from("bin/quarto"))
        );
        assert_eq!(strip_first_component(Path::new("quarto-1.3/")), None);
        assert_eq!(strip_first_component(Path::new("top/../../etc/passwd")), None);
    }

    #[test]
    fn missing_tarball_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_tar_gz_stripped(&dir.path().join("nope.tar.gz"), dir.path()).unwrap_err();
        assert!(matches!(err, WbiError::Io { .. }));
    }
}
