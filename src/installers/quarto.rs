// Quarto ships as a .deb for Ubuntu and as a tarball for everything else, so RHEL
// installs are unpacked into `/opt/quarto/<version>` instead of going through yum.

use crate::errors::WbiError;
use crate::installers::{InstallerInfo, Installer};
use crate::libs::http;
use crate::libs::os::{OperatingSystem, PackageKind};
use crate::libs::paths::QUARTO_ROOT;
use crate::libs::utilities::compression::extract_tar_gz_stripped;
use crate::log_debug;
use anyhow::Context;
use std::path::{Path, PathBuf};

const RELEASES: &str = "https://github.com/quarto-dev/quarto-cli/releases/download";

pub fn installer_info(version: &str, os: OperatingSystem) -> InstallerInfo {
    let name = match os.package_kind() {
        PackageKind::Deb => format!("quarto-{version}-linux-amd64.deb"),
        PackageKind::Rpm => format!("quarto-{version}-linux-amd64.tar.gz"),
    };
    InstallerInfo {
        url: format!("{RELEASES}/v{version}/{name}"),
        name,
        version: version.to_string(),
    }
}

/// Where a tarball install of `version` lives.
pub fn install_dir(root: &Path, version: &str) -> PathBuf {
    root.join(version)
}

pub fn install(installer: &mut Installer, version: &str) -> anyhow::Result<()> {
    let info = installer_info(version, installer.os());
    match installer.os().package_kind() {
        PackageKind::Deb => installer.install_package(&info),
        PackageKind::Rpm => {
            let tarball = http::download_to_temp(&info.url, &info.name)
                .with_context(|| format!("downloading {}", info.name))?;
            let dest = install_dir(Path::new(QUARTO_ROOT), version);
            unpack(&tarball, &dest).context("extracting Quarto")?;
            Ok(())
        }
    }
}

fn unpack(tarball: &Path, dest: &Path) -> Result<(), WbiError> {
    log_debug!("[Quarto] Unpacking {} into {}", tarball.display(), dest.display());
    extract_tar_gz_stripped(tarball, dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ubuntu_gets_the_deb() {
        let info = installer_info("1.3.450", OperatingSystem::Ubuntu22);
        assert_eq!(
            info.url,
            "https://github.com/quarto-dev/quarto-cli/releases/download/v1.3.450/quarto-1.3.450-linux-amd64.deb"
        );
    }

    #[test]
    fn rhel_gets_the_tarball() {
        let info = installer_info("1.4.549", OperatingSystem::Rhel9);
        assert_eq!(info.name, "quarto-1.4.549-linux-amd64.tar.gz");
        assert!(info.url.ends_with("/v1.4.549/quarto-1.4.549-linux-amd64.tar.gz"));
    }

    #[test]
    fn tarball_installs_are_versioned_under_the_root() {
        assert_eq!(
            install_dir(Path::new("/opt/quarto"), "1.3.450"),
            PathBuf::from("/opt/quarto/1.3.450")
        );
    }
}
