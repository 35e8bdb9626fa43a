// Discovery of existing R, Python, and Quarto installations.
//
// Three sources, in order: well-known single binaries, `<root>/<version>/bin/<binary>`
// under each install root, then a PATH lookup. Paths are deduplicated by exact string
// equality only, so a symlink and its target are both reported if both are found.

use crate::cli::type_enums::Language;
use crate::errors::WbiError;
use crate::log_debug;
use colored::Colorize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where to look for one language's interpreters.
#[derive(Debug, Clone)]
pub struct ScanLocations {
    pub known_files: Vec<PathBuf>,
    pub roots: Vec<PathBuf>,
    /// Binary names tried inside each `<root>/<version>/bin`, first match wins.
    pub binaries: Vec<&'static str>,
}

impl ScanLocations {
    pub fn for_language(language: Language) -> Self {
        let (known_files, roots, binaries): (&[&str], &[&str], Vec<&'static str>) = match language {
            Language::R => (
                &["/usr/lib/R/bin/R", "/usr/lib64/R/bin/R", "/usr/local/bin/R", "/usr/bin/R"],
                &["/opt/R", "/opt/local/R"],
                vec!["R"],
            ),
            Language::Python => (
                &["/usr/bin/python3", "/usr/local/bin/python3"],
                &["/opt/python", "/opt/Python"],
                vec!["python3", "python"],
            ),
            Language::Quarto => (
                &["/usr/lib/rstudio-server/bin/quarto/bin/quarto", "/usr/local/bin/quarto"],
                &["/opt/quarto"],
                vec!["quarto"],
            ),
        };

        ScanLocations {
            known_files: known_files.iter().map(PathBuf::from).collect(),
            roots: roots.iter().map(PathBuf::from).collect(),
            binaries,
        }
    }
}

/// Scans the host for installations of `language`.
///
/// An empty result is not an error; callers decide whether zero installs matter.
pub fn scan_for_versions(language: Language) -> Result<Vec<String>, WbiError> {
    let locations = ScanLocations::for_language(language);
    let on_path: Vec<PathBuf> = locations
        .binaries
        .iter()
        .filter_map(|binary| which::which(binary).ok())
        .collect();

    let found = scan_locations(&locations, &on_path)?;
    log_debug!(
        "[Scanner] Found {} {} installation(s)",
        found.len(),
        language.display_name().bold()
    );
    Ok(found)
}

/// The filesystem walk behind [`scan_for_versions`], with the PATH lookup results
/// supplied by the caller.
///
/// A missing root directory contributes nothing; any other error reading a root aborts.
pub fn scan_locations(
    locations: &ScanLocations,
    on_path: &[PathBuf],
) -> Result<Vec<String>, WbiError> {
    let mut found: Vec<String> = Vec::new();

    for file in &locations.known_files {
        if file.is_file() {
            push_unique(&mut found, file);
        }
    }

    for root in &locations.roots {
        for version_dir in version_dirs(root)? {
            let bin = version_dir.join("bin");
            if let Some(binary) = locations
                .binaries
                .iter()
                .map(|name| bin.join(name))
                .find(|candidate| candidate.is_file())
            {
                push_unique(&mut found, &binary);
            }
        }
    }

    for path in on_path {
        push_unique(&mut found, path);
    }

    Ok(found)
}

/// Subdirectories of an install root, sorted by name for stable output.
fn version_dirs(root: &Path) -> Result<Vec<PathBuf>, WbiError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log_debug!("[Scanner] {} does not exist, skipping", root.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(WbiError::io("listing", root, e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WbiError::io("listing", root, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn push_unique(found: &mut Vec<String>, path: &Path) {
    let path = path.display().to_string();
    if !found.contains(&path) {
        found.push(path);
    }
}
