// Installs Posit Workbench from the current stable release listed in the Posit
// downloads manifest.

use crate::installers::{Installer, InstallerInfo};
use crate::libs::http::{self, DOWNLOAD_TIMEOUT};
use crate::libs::os::OperatingSystem;
use crate::libs::paths::WORKBENCH_SERVER_BINARY;
use crate::{log_info, log_warn};
use anyhow::{Context, anyhow};
use colored::Colorize;
use serde::Deserialize;
use std::path::Path;

const DOWNLOADS_JSON: &str = "https://www.rstudio.com/wp-content/downloads.json";

/// Shape of `downloads.json`, down to the Workbench installers.
#[derive(Debug, Deserialize)]
pub struct Downloads {
    pub rstudio: RStudio,
}

#[derive(Debug, Deserialize)]
pub struct RStudio {
    pub pro: Pro,
}

#[derive(Debug, Deserialize)]
pub struct Pro {
    pub stable: Stable,
}

#[derive(Debug, Deserialize)]
pub struct Stable {
    pub server: Server,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub installer: Installers,
}

#[derive(Debug, Deserialize)]
pub struct Installers {
    pub focal: Option<Download>,
    pub jammy: Option<Download>,
    pub redhat7_64: Option<Download>,
    pub rhel8: Option<Download>,
    pub rhel9: Option<Download>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Download {
    pub url: String,
    pub version: String,
}

impl Installers {
    fn for_os(&self, os: OperatingSystem) -> Option<&Download> {
        match os {
            OperatingSystem::Ubuntu20 => self.focal.as_ref(),
            OperatingSystem::Ubuntu22 => self.jammy.as_ref(),
            OperatingSystem::Rhel7 => self.redhat7_64.as_ref(),
            OperatingSystem::Rhel8 => self.rhel8.as_ref(),
            OperatingSystem::Rhel9 => self.rhel9.as_ref(),
        }
    }
}

/// Picks the Workbench installer for `os` out of the downloads manifest.
pub fn installer_info(downloads: &Downloads, os: OperatingSystem) -> anyhow::Result<InstallerInfo> {
    let download = downloads
        .rstudio
        .pro
        .stable
        .server
        .installer
        .for_os(os)
        .ok_or_else(|| anyhow!("no Workbench installer is published for {os}"))?;

    let name = download
        .url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("rstudio-workbench")
        .to_string();

    Ok(InstallerInfo {
        name,
        url: download.url.clone(),
        version: download.version.clone(),
    })
}

pub fn is_installed() -> bool {
    Path::new(WORKBENCH_SERVER_BINARY).exists()
}

pub fn install(installer: &mut Installer) -> anyhow::Result<()> {
    if is_installed() {
        log_warn!("Workbench is already installed, skipping");
        return Ok(());
    }

    let downloads: Downloads =
        http::get_json(DOWNLOADS_JSON, DOWNLOAD_TIMEOUT).context("fetching the Workbench downloads list")?;
    let info = installer_info(&downloads, installer.os())?;
    installer
        .install_package(&info)
        .with_context(|| format!("installing Workbench {}", info.version))?;

    log_info!("Workbench {} successfully installed", info.version.green());
    Ok(())
}
