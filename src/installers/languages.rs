// Download locations for the Posit-built R and Python packages.
use crate::cli::type_enums::Language;
use crate::installers::InstallerInfo;
use crate::libs::os::{OperatingSystem, PackageKind};

const CDN_BASE: &str = "https://cdn.posit.co";

/// Resolves the package for one R or Python version on `os`.
///
/// Quarto is published elsewhere; see [`crate::installers::quarto`].
pub fn installer_info(language: Language, version: &str, os: OperatingSystem) -> InstallerInfo {
    let slug = os.cdn_slug();
    let (dir, name) = match (language, os.package_kind()) {
        (Language::R, PackageKind::Deb) => ("r", format!("r-{version}_1_amd64.deb")),
        (Language::R, PackageKind::Rpm) => ("r", format!("R-{version}-1-1.x86_64.rpm")),
        (Language::Python, PackageKind::Deb) => ("python", format!("python-{version}_1_amd64.deb")),
        (Language::Python, PackageKind::Rpm) => ("python", format!("python-{version}-1-1.x86_64.rpm")),
        (Language::Quarto, _) => {
            return crate::installers::quarto::installer_info(version, os);
        }
    };

    InstallerInfo {
        url: format!("{CDN_BASE}/{dir}/{slug}/pkgs/{name}"),
        name,
        version: version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r_on_ubuntu_uses_debs() {
        let info = installer_info(Language::R, "4.3.1", OperatingSystem::Ubuntu22);
        assert_eq!(info.url, "https://cdn.posit.co/r/ubuntu-2204/pkgs/r-4.3.1_1_amd64.deb");
        assert_eq!(info.name, "r-4.3.1_1_amd64.deb");
        assert_eq!(info.version, "4.3.1");
    }

    #[test]
    fn r_on_rhel_uses_rpms() {
        let info = installer_info(Language::R, "4.2.3", OperatingSystem::Rhel8);
        assert_eq!(info.url, "https://cdn.posit.co/r/centos-8/pkgs/R-4.2.3-1-1.x86_64.rpm");

        let info = installer_info(Language::R, "4.2.3", OperatingSystem::Rhel9);
        assert_eq!(info.url, "https://cdn.posit.co/r/rhel-9/pkgs/R-4.2.3-1-1.x86_64.rpm");
    }

    #[test]
    fn python_urls_follow_the_same_layout() {
        let info = installer_info(Language::Python, "3.11.6", OperatingSystem::Ubuntu20);
        assert_eq!(
            info.url,
            "https://cdn.posit.co/python/ubuntu-2004/pkgs/python-3.11.6_1_amd64.deb"
        );
        let info = installer_info(Language::Python, "3.11.6", OperatingSystem::Rhel7);
        assert_eq!(
            info.url,
            "https://cdn.posit.co/python/centos-7/pkgs/python-3.11.6-1-1.x86_64.rpm"
        );
    }

    #[test]
    fn quarto_is_delegated() {
        let info = installer_info(Language::Quarto, "1.3.450", OperatingSystem::Ubuntu22);
        assert!(info.url.contains("quarto-dev/quarto-cli"));
    }
}
