// Jupyter for Workbench: notebook and lab packages in one chosen Python, the Posit
// extensions, an ipykernel for every other Python on the host, and `jupyter.conf`.

use crate::errors::WbiError;
use crate::libs::config_writer::{self, ConfigBlock};
use crate::libs::paths::ConfigPaths;
use crate::libs::system::Executor;
use crate::{log_info, log_warn};
use anyhow::Context;
use colored::Colorize;
use std::path::{Path, PathBuf};

const JUPYTER_PACKAGES: &str = "jupyter jupyterlab rsp_jupyter rsconnect_jupyter workbench_jupyterlab";

/// The `jupyter` executable installed next to `python`.
pub fn jupyter_exe(python: &Path) -> PathBuf {
    python
        .parent()
        .map(|bin| bin.join("jupyter"))
        .unwrap_or_else(|| PathBuf::from("jupyter"))
}

/// Commands that install Jupyter and enable the Posit extensions in `python`.
pub fn install_commands(python: &Path) -> Vec<String> {
    let py = python.display();
    let jupyter = jupyter_exe(python);
    let jupyter = jupyter.display();
    vec![
        format!("{py} -m pip install --upgrade pip"),
        format!("{py} -m pip install {JUPYTER_PACKAGES}"),
        format!("{jupyter}-nbextension install --sys-prefix --py rsp_jupyter"),
        format!("{jupyter}-nbextension enable --sys-prefix --py rsp_jupyter"),
        format!("{jupyter}-nbextension install --sys-prefix --py rsconnect_jupyter"),
        format!("{jupyter}-nbextension enable --sys-prefix --py rsconnect_jupyter"),
        format!("{jupyter}-serverextension enable --sys-prefix --py rsconnect_jupyter"),
    ]
}

/// Pulls `3.11.6` out of `python --version` output such as `Python 3.11.6`.
pub fn parse_python_version(output: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Python "))
        .map(str::trim)
        .find(|version| !version.is_empty())
        .map(str::to_string)
}

/// Commands registering `python` as a kernel named after its version.
pub fn kernel_commands(python: &Path, version: &str) -> Vec<String> {
    let py = python.display();
    vec![
        format!("{py} -m pip install ipykernel"),
        format!("{py} -m ipykernel install --name py{version} --display-name \"Python {version}\""),
    ]
}

/// Installs Jupyter into `python` and registers `other_pythons` as extra kernels.
pub fn install(
    executor: &Executor,
    paths: &ConfigPaths,
    python: &Path,
    other_pythons: &[PathBuf],
) -> anyhow::Result<()> {
    for command in install_commands(python) {
        executor.run(&command, true).context("installing Jupyter")?;
    }

    for other in other_pythons.iter().filter(|p| p.as_path() != python) {
        let output = executor
            .run(&format!("{} --version", other.display()), false)
            .with_context(|| format!("reading the version of {}", other.display()))?;
        let Some(version) = parse_python_version(&output) else {
            log_warn!("Could not determine the version of {}, skipping its kernel", other.display());
            continue;
        };
        for command in kernel_commands(other, &version) {
            executor
                .run(&command, true)
                .with_context(|| format!("registering the Python {version} kernel"))?;
        }
    }

    match config_writer::write_block(&ConfigBlock::jupyter(paths, &jupyter_exe(python))) {
        Ok(()) => {}
        Err(WbiError::AlreadyExists { file, .. }) => {
            log_warn!("Jupyter is already configured in {}, leaving it as is", file.display());
        }
        Err(e) => return Err(e).context("writing the Jupyter configuration"),
    }

    log_info!("Jupyter successfully installed into {}", python.display().to_string().green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jupyter_lives_next_to_python() {
        assert_eq!(
            jupyter_exe(Path::new("/opt/python/3.11.6/bin/python3")),
            PathBuf::from("/opt/python/3.11.6/bin/jupyter")
        );
    }

    #[test]
    fn install_commands_use_the_chosen_interpreter() {
        let commands = install_commands(Path::new("/opt/python/3.11.6/bin/python3"));
        assert_eq!(commands[0], "/opt/python/3.11.6/bin/python3 -m pip install --upgrade pip");
        assert_eq!(
            commands[1],
            "/opt/python/3.11.6/bin/python3 -m pip install jupyter jupyterlab rsp_jupyter rsconnect_jupyter workbench_jupyterlab"
        );
        assert!(commands.iter().skip(2).all(|c| c.starts_with("/opt/python/3.11.6/bin/jupyter-")));
    }

    #[test]
    fn parses_interpreter_versions() {
        assert_eq!(parse_python_version("Python 3.10.13\n"), Some("3.10.13".to_string()));
        assert_eq!(parse_python_version("warning: something\nPython 3.9.18"), Some("3.9.18".to_string()));
        assert_eq!(parse_python_version("python: command not found"), None);
        assert_eq!(parse_python_version(""), None);
    }

    #[test]
    fn kernels_are_named_after_the_version() {
        let commands = kernel_commands(Path::new("/opt/python/3.10.13/bin/python3"), "3.10.13");
        assert_eq!(
            commands[1],
            "/opt/python/3.10.13/bin/python3 -m ipykernel install --name py3.10.13 --display-name \"Python 3.10.13\""
        );
    }
}
