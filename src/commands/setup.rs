// `wbi setup`: the guided path through everything the other subcommands do.
//
// Steps run in a fixed order and every one of them can be declined. Config blocks
// that already exist are reported and skipped so setup can be re-run on a half
// configured host; every other failure stops the run.

use crate::cli::cmd_enums::SetupArgs;
use crate::cli::type_enums::{Language, RepoLanguage};
use crate::commands::activate::activate_license;
use crate::errors::WbiError;
use crate::installers::{Installer, jupyter, prodrivers, symlinks, workbench};
use crate::libs::config_writer::{ConfigBlock, write_block};
use crate::libs::os::{OperatingSystem, detect_os};
use crate::libs::paths::ConfigPaths;
use crate::libs::privileges::require_root;
use crate::libs::prompts;
use crate::libs::scanner::scan_for_versions;
use crate::libs::system::Executor;
use crate::libs::utilities::path_helpers::existing_file;
use crate::libs::verification;
use crate::libs::versions::{StaticCatalog, VersionCatalog, sort_versions};
use crate::logger::Logger;
use crate::{log_info, log_warn};
use anyhow::Context;
use colored::Colorize;
use std::path::PathBuf;

const PUBLIC_PACKAGE_MANAGER: &str = "https://packagemanager.posit.co";

pub fn validate(args: &SetupArgs) -> Result<(), WbiError> {
    if args.args.is_empty() {
        Ok(())
    } else {
        Err(WbiError::validation("setup does not take any arguments"))
    }
}

/// Catalog versions newest first, with only the newest preselected.
pub fn version_choices(catalog: &dyn VersionCatalog, language: Language) -> (Vec<String>, Vec<bool>) {
    let versions = sort_versions(&catalog.valid_versions(language));
    let defaults = (0..versions.len()).map(|i| i == 0).collect();
    (versions, defaults)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Saml,
    Oidc,
    None,
}

impl AuthMethod {
    pub const ALL: [AuthMethod; 3] = [AuthMethod::Saml, AuthMethod::Oidc, AuthMethod::None];

    pub fn label(&self) -> &'static str {
        match self {
            AuthMethod::Saml => "SAML",
            AuthMethod::Oidc => "OpenID Connect",
            AuthMethod::None => "Skip (keep PAM authentication)",
        }
    }
}

/// Writes `block`, treating an existing block as already done.
fn write_or_skip(block: &ConfigBlock) -> Result<(), WbiError> {
    match write_block(block) {
        Err(WbiError::AlreadyExists { marker, file }) => {
            log_warn!("{} is already set in {}, skipping", marker, file.display());
            Ok(())
        }
        other => other,
    }
}

pub fn run(logger: &Logger) -> anyhow::Result<()> {
    require_root()?;
    let os = detect_os()?;
    log_info!("Setting up Posit Workbench on {}", os.to_string().bold());

    let executor = Executor::new(logger.transcript());
    let mut installer = Installer::new(os, &executor);
    let paths = ConfigPaths::default();
    let catalog = StaticCatalog;

    setup_language(&mut installer, &catalog, &paths, Language::R).context("setting up R")?;
    setup_language(&mut installer, &catalog, &paths, Language::Python).context("setting up Python")?;

    if prompts::confirm("Install Posit Workbench?", true)? {
        workbench::install(&mut installer)?;
    }

    setup_jupyter(&executor, &paths).context("setting up Jupyter")?;

    if prompts::confirm("Install Posit Pro Drivers?", true)? {
        prodrivers::install(&mut installer)?;
    }

    setup_language(&mut installer, &catalog, &paths, Language::Quarto).context("setting up Quarto")?;
    setup_ssl(&executor, &paths).context("setting up SSL")?;
    setup_auth(&paths).context("setting up authentication")?;
    setup_package_manager(os, &paths).context("setting up Posit Package Manager")?;
    setup_connect(&paths).context("setting up Posit Connect")?;

    if prompts::confirm("Activate a Workbench license?", true)? {
        let key = prompts::password("License key")?;
        activate_license(&executor, &key)?;
    }

    if prompts::confirm("Restart Workbench now to apply the configuration?", true)? {
        executor
            .run("rstudio-server restart", true)
            .context("restarting Workbench")?;
    }

    log_info!("{}", "Workbench setup complete".green().bold());
    Ok(())
}

fn setup_language(
    installer: &mut Installer,
    catalog: &dyn VersionCatalog,
    paths: &ConfigPaths,
    language: Language,
) -> anyhow::Result<()> {
    let name = language.display_name();
    let existing = scan_for_versions(language)?;
    if !existing.is_empty() {
        log_info!("Found existing {} installations: {}", name, existing.join(", "));
    }

    if !prompts::confirm(&format!("Install {name}?"), true)? {
        return Ok(());
    }

    let (versions, defaults) = version_choices(catalog, language);
    let chosen: Vec<String> = prompts::multiselect(&format!("{name} version(s) to install"), &versions, &defaults)?
        .into_iter()
        .map(|i| versions[i].clone())
        .collect();
    if chosen.is_empty() {
        log_warn!("No {} versions selected", name);
        return Ok(());
    }

    for version in &chosen {
        installer.download_and_install(language, version)?;
    }

    match language {
        Language::R => {
            if let Some(version) = pick_link_target("Symlink an R version into /usr/local/bin?", name, &chosen)? {
                symlinks::link_r(installer.executor(), version)?;
            }
        }
        Language::Python => {
            let prompt = "Make a Python version the default python3 and add it to PATH?";
            if let Some(version) = pick_link_target(prompt, name, &chosen)? {
                symlinks::link_python(installer.executor(), paths, version)?;
            }
        }
        Language::Quarto => {}
    }
    Ok(())
}

fn pick_link_target<'v>(prompt: &str, name: &str, chosen: &'v [String]) -> anyhow::Result<Option<&'v str>> {
    if !prompts::confirm(prompt, true)? {
        return Ok(None);
    }
    let index = match chosen.len() {
        1 => 0,
        _ => prompts::select(&format!("{name} version to link"), chosen, 0)?,
    };
    Ok(Some(chosen[index].as_str()))
}

fn setup_jupyter(executor: &Executor, paths: &ConfigPaths) -> anyhow::Result<()> {
    if !prompts::confirm("Install Jupyter?", true)? {
        return Ok(());
    }

    let scanned = scan_for_versions(Language::Python)?;
    if scanned.is_empty() {
        log_warn!("No Python installations found, skipping Jupyter");
        return Ok(());
    }
    let index = prompts::select("Python to install Jupyter into", &scanned, 0)?;
    let others: Vec<PathBuf> = scanned.iter().map(PathBuf::from).collect();
    jupyter::install(executor, paths, &others[index], &others)
}

fn setup_ssl(executor: &Executor, paths: &ConfigPaths) -> anyhow::Result<()> {
    if !prompts::confirm("Configure SSL?", false)? {
        return Ok(());
    }
    let cert = existing_file(&prompts::text("Path to the SSL certificate")?)?;
    let key = existing_file(&prompts::text("Path to the SSL certificate key")?)?;
    verification::verify_ssl(executor, &cert, &key)?;
    write_or_skip(&ConfigBlock::ssl(paths, &cert, &key))?;
    Ok(())
}

fn setup_auth(paths: &ConfigPaths) -> anyhow::Result<()> {
    let labels: Vec<String> = AuthMethod::ALL.iter().map(|m| m.label().to_string()).collect();
    let method = AuthMethod::ALL[prompts::select("Authentication method", &labels, 2)?];

    match method {
        AuthMethod::Saml => {
            let metadata = prompts::text("SAML metadata URL")?;
            let attribute = prompts::optional_text("Username attribute (blank for the default)")?;
            write_or_skip(&ConfigBlock::saml(paths, &metadata, attribute.as_deref()))?;
        }
        AuthMethod::Oidc => {
            let issuer = prompts::text("OpenID Connect issuer URL")?;
            let claim = prompts::optional_text("Username claim (blank for the default)")?;
            let client_id = prompts::text("Client ID")?;
            let client_secret = prompts::password("Client secret")?;
            write_or_skip(&ConfigBlock::oidc(paths, &issuer, claim.as_deref()))?;
            write_or_skip(&ConfigBlock::oidc_client_secret(paths, &client_id, &client_secret))?;
        }
        AuthMethod::None => {}
    }
    Ok(())
}

fn setup_package_manager(os: OperatingSystem, paths: &ConfigPaths) -> anyhow::Result<()> {
    if !prompts::confirm("Configure Posit Package Manager repositories?", true)? {
        return Ok(());
    }

    let options = vec![
        format!("Public Posit Package Manager ({PUBLIC_PACKAGE_MANAGER})"),
        "My own Posit Package Manager".to_string(),
    ];
    let url = match prompts::select("Which Package Manager?", &options, 0)? {
        0 => PUBLIC_PACKAGE_MANAGER.to_string(),
        _ => prompts::text("Package Manager URL")?,
    };
    verification::verify_package_manager(&url)?;

    for language in [RepoLanguage::R, RepoLanguage::Python] {
        let (default_repo, label) = match language {
            RepoLanguage::R => ("cran", "CRAN"),
            RepoLanguage::Python => ("pypi", "PyPI"),
        };
        if !prompts::confirm(&format!("Configure a {label} repository?"), true)? {
            continue;
        }
        let repo = prompts::optional_text(&format!("{label} repository name (blank for '{default_repo}')"))?
            .unwrap_or_else(|| default_repo.to_string());
        let repo_url = verification::verify_package_manager_repo(&url, &repo, language, Some(os))?;
        let block = match language {
            RepoLanguage::R => ConfigBlock::cran_repo(paths, &repo_url),
            RepoLanguage::Python => ConfigBlock::pypi_repo(paths, &repo_url),
        };
        write_or_skip(&block)?;
    }
    Ok(())
}

fn setup_connect(paths: &ConfigPaths) -> anyhow::Result<()> {
    if !prompts::confirm("Set a default Posit Connect server?", false)? {
        return Ok(());
    }
    let url = prompts::text("Posit Connect URL")?;
    verification::verify_connect_url(&url)?;
    write_or_skip(&ConfigBlock::connect_url(paths, &url))?;
    Ok(())
}
