// `wbi install <target>`: R, Python, Quarto, Workbench, Pro Drivers, or Jupyter.

use crate::cli::cmd_enums::InstallArgs;
use crate::cli::type_enums::{InstallTarget, Language};
use crate::commands::validation;
use crate::errors::WbiError;
use crate::installers::{Installer, jupyter, prodrivers, workbench};
use crate::libs::os::detect_os;
use crate::libs::paths::ConfigPaths;
use crate::libs::privileges::require_root;
use crate::libs::scanner::scan_for_versions;
use crate::libs::system::Executor;
use crate::libs::utilities::path_helpers::existing_file;
use crate::libs::versions::{self, VersionCatalog};
use crate::log_debug;
use crate::logger::Logger;
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRequest {
    Language { language: Language, versions: Vec<String> },
    Workbench,
    ProDrivers,
    /// `python` is the interpreter to install into; `None` picks the first one scanned.
    Jupyter { python: Option<PathBuf> },
}

pub fn validate(args: &InstallArgs, catalog: &dyn VersionCatalog) -> Result<InstallRequest, WbiError> {
    let target: InstallTarget = validation::parse_item(&args.args)?;

    if target.language().is_none() {
        validation::forbid(&args.version, "the version flag is only supported for r, python and quarto")?;
    }
    if target != InstallTarget::Jupyter {
        validation::forbid(&args.path, "the path flag is only supported for jupyter")?;
    }

    let request = match target {
        InstallTarget::R | InstallTarget::Python | InstallTarget::Quarto => {
            // Exhaustive above: these three always carry a language.
            let language = target
                .language()
                .ok_or_else(|| WbiError::validation(format!("{target} has no versions")))?;
            let versions = match &args.version {
                Some(requested) => {
                    versions::validate_versions(catalog, language, requested)?;
                    requested.clone()
                }
                None => versions::latest_version(catalog, language)
                    .into_iter()
                    .collect(),
            };
            InstallRequest::Language { language, versions }
        }
        InstallTarget::Workbench => InstallRequest::Workbench,
        InstallTarget::ProDrivers => InstallRequest::ProDrivers,
        InstallTarget::Jupyter => InstallRequest::Jupyter {
            python: args.path.as_deref().map(existing_file).transpose()?,
        },
    };

    log_debug!("[Install] Validated request: {:?}", request);
    Ok(request)
}

pub fn run(request: InstallRequest, logger: &Logger) -> anyhow::Result<()> {
    require_root()?;
    let executor = Executor::new(logger.transcript());

    match request {
        InstallRequest::Language { language, versions } => {
            let mut installer = Installer::new(detect_os()?, &executor);
            for version in &versions {
                installer.download_and_install(language, version)?;
            }
        }
        InstallRequest::Workbench => {
            let mut installer = Installer::new(detect_os()?, &executor);
            workbench::install(&mut installer)?;
        }
        InstallRequest::ProDrivers => {
            let mut installer = Installer::new(detect_os()?, &executor);
            prodrivers::install(&mut installer)?;
        }
        InstallRequest::Jupyter { python } => {
            let scanned: Vec<PathBuf> = scan_for_versions(Language::Python)
                .context("scanning for Python installations")?
                .into_iter()
                .map(PathBuf::from)
                .collect();
            let python = choose_python(python, &scanned)?;
            jupyter::install(&executor, &ConfigPaths::default(), &python, &scanned)?;
        }
    }
    Ok(())
}

/// The explicit `--path` wins; otherwise the first scanned interpreter is used.
fn choose_python(explicit: Option<PathBuf>, scanned: &[PathBuf]) -> Result<PathBuf, WbiError> {
    explicit
        .or_else(|| scanned.first().cloned())
        .ok_or_else(|| WbiError::validation("no Python installations found; please provide the path flag"))
}
