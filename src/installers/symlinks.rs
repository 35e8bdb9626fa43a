// Puts freshly installed runtimes on the default PATH: R and Rscript are linked into
// /usr/local/bin; Python gets a `python3` link plus a profile.d PATH entry.

use crate::errors::WbiError;
use crate::libs::config_writer::{self, ConfigBlock};
use crate::libs::paths::{ConfigPaths, SYMLINK_DIR};
use crate::libs::system::Executor;
use crate::{log_info, log_warn};
use anyhow::Context;
use std::path::{Path, PathBuf};

const R_ROOT: &str = "/opt/R";
const PYTHON_ROOT: &str = "/opt/python";

pub fn r_commands(version: &str) -> Vec<String> {
    ["R", "Rscript"]
        .iter()
        .map(|binary| format!("ln -sf {R_ROOT}/{version}/bin/{binary} {SYMLINK_DIR}/{binary}"))
        .collect()
}

pub fn python_bin_dir(version: &str) -> PathBuf {
    Path::new(PYTHON_ROOT).join(version).join("bin")
}

pub fn python_commands(version: &str) -> Vec<String> {
    vec![format!(
        "ln -sf {}/python {SYMLINK_DIR}/python3",
        python_bin_dir(version).display()
    )]
}

pub fn link_r(executor: &Executor, version: &str) -> anyhow::Result<()> {
    for command in r_commands(version) {
        executor
            .run(&command, true)
            .with_context(|| format!("symlinking R {version}"))?;
    }
    log_info!("R {} is now the default R", version);
    Ok(())
}

pub fn link_python(executor: &Executor, paths: &ConfigPaths, version: &str) -> anyhow::Result<()> {
    for command in python_commands(version) {
        executor
            .run(&command, true)
            .with_context(|| format!("symlinking Python {version}"))?;
    }

    match config_writer::write_block(&ConfigBlock::python_path(paths, &python_bin_dir(version))) {
        Ok(()) => {}
        Err(WbiError::AlreadyExists { file, .. }) => {
            log_warn!("A Python PATH entry already exists in {}, leaving it as is", file.display());
        }
        Err(e) => return Err(e).context("adding Python to PATH"),
    }

    log_info!("Python {} is now the default python3", version);
    Ok(())
}
