// Installer pipeline: resolve an installer URL for the host, download it, make sure
// OS prerequisites are in place, and hand the package to the distro's package tool.
//
// Every step is a hard failure point and nothing is cleaned up on failure; package
// managers are idempotent at the package level, so re-running is the recovery path.

use crate::cli::type_enums::Language;
use crate::libs::http;
use crate::libs::os::{OperatingSystem, PackageKind};
use crate::libs::system::Executor;
use crate::log_info;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

// Posit CDN builds of R and Python.
pub mod languages;
// Jupyter, its extensions, and extra kernels.
pub mod jupyter;
// EPEL, CodeReady, gdebi and friends.
pub mod prerequisites;
// Posit Pro ODBC drivers.
pub mod prodrivers;
// Quarto: a .deb on Ubuntu, a tarball on RHEL.
pub mod quarto;
// Making freshly installed runtimes visible on PATH.
pub mod symlinks;
// Workbench itself.
pub mod workbench;

/// A resolved download for one (package, version, OS) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerInfo {
    pub name: String,
    pub url: String,
    pub version: String,
}

/// Builds the distro-specific command that installs a local package file.
pub fn package_install_command(kind: PackageKind, package: &Path) -> String {
    match kind {
        PackageKind::Deb => format!("gdebi -n {}", package.display()),
        PackageKind::Rpm => format!("yum install -y {}", package.display()),
    }
}

/// Runs installs for one host. Prerequisites are installed at most once per run.
pub struct Installer<'a> {
    os: OperatingSystem,
    executor: &'a Executor<'a>,
    prerequisites: Vec<String>,
    prerequisites_installed: bool,
}

impl<'a> Installer<'a> {
    pub fn new(os: OperatingSystem, executor: &'a Executor<'a>) -> Self {
        Installer::with_prerequisites(os, executor, prerequisites::commands(os))
    }

    fn with_prerequisites(os: OperatingSystem, executor: &'a Executor<'a>, prerequisites: Vec<String>) -> Self {
        Installer {
            os,
            executor,
            prerequisites,
            prerequisites_installed: false,
        }
    }

    pub fn os(&self) -> OperatingSystem {
        self.os
    }

    pub fn executor(&self) -> &'a Executor<'a> {
        self.executor
    }

    pub fn ensure_prerequisites(&mut self) -> anyhow::Result<()> {
        if self.prerequisites_installed {
            return Ok(());
        }
        for command in &self.prerequisites {
            self.executor
                .run(command, true)
                .context("installing prerequisites")?;
        }
        self.prerequisites_installed = true;
        Ok(())
    }

    /// Downloads `info`, installs prerequisites, and installs the package file.
    pub fn install_package(&mut self, info: &InstallerInfo) -> anyhow::Result<()> {
        let package = http::download_to_temp(&info.url, &info.name)
            .with_context(|| format!("downloading {}", info.name))?;
        self.ensure_prerequisites()?;
        self.executor
            .run(&package_install_command(self.os.package_kind(), &package), true)
            .with_context(|| format!("installing {}", info.name))?;
        Ok(())
    }

    /// Installs one version of a language from its published installer.
    pub fn download_and_install(&mut self, language: Language, version: &str) -> anyhow::Result<()> {
        match language {
            Language::R | Language::Python => {
                let info = languages::installer_info(language, version, self.os);
                self.install_package(&info)
                    .with_context(|| format!("installing {} {}", language.display_name(), version))?;
            }
            Language::Quarto => {
                quarto::install(self, version)
                    .with_context(|| format!("installing Quarto {version}"))?;
            }
        }

        log_info!(
            "{} {} successfully installed",
            language.display_name().bold(),
            version.green()
        );
        Ok(())
    }
}
