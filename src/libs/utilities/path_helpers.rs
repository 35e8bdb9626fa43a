// Helpers for paths typed in by the operator (flags and prompts).
use crate::errors::WbiError;
use crate::log_debug;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Resolves paths that start with a tilde `~` into the operator's home directory.
///
/// If the path does not start with `~`, or the home directory cannot be determined,
/// the input is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            // Only the first `~` is the home shortcut.
            return PathBuf::from(path.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    PathBuf::from(path)
}

/// Expands `~` and requires the resulting file to exist, returning its absolute path.
///
/// Workbench reads paths from its config files relative to nothing, so anything we
/// write there has to be absolute.
pub fn existing_file(path: &str) -> Result<PathBuf, WbiError> {
    let expanded = expand_tilde(path);
    if !expanded.is_file() {
        return Err(WbiError::MissingFile(expanded));
    }
    let absolute = absolute(&expanded)?;
    log_debug!(
        "[Paths] Resolved '{}' to {}",
        path,
        absolute.display().to_string().cyan()
    );
    Ok(absolute)
}

fn absolute(path: &Path) -> Result<PathBuf, WbiError> {
    std::fs::canonicalize(path).map_err(|e| WbiError::io("resolving", path, e))
}
