// Host distribution detection.
// The result is computed once per run and passed around by value; everything that
// differs by distro (URLs, package commands, repo names) matches on it exhaustively.

use crate::errors::WbiError;
use crate::log_debug;
use std::fmt;
use std::fs;
use std::path::Path;

const REDHAT_RELEASE: &str = "/etc/redhat-release";
const ISSUE: &str = "/etc/issue";

/// The Linux distributions Workbench (and therefore `wbi`) supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Ubuntu20,
    Ubuntu22,
    Rhel7,
    Rhel8,
    Rhel9,
}

/// Which package format and installer command a distro uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Deb,
    Rpm,
}

impl OperatingSystem {
    pub fn package_kind(&self) -> PackageKind {
        match self {
            OperatingSystem::Ubuntu20 | OperatingSystem::Ubuntu22 => PackageKind::Deb,
            OperatingSystem::Rhel7 | OperatingSystem::Rhel8 | OperatingSystem::Rhel9 => {
                PackageKind::Rpm
            }
        }
    }

    /// Directory name the Posit CDN uses for this distro's R and Python builds.
    pub fn cdn_slug(&self) -> &'static str {
        match self {
            OperatingSystem::Ubuntu20 => "ubuntu-2004",
            OperatingSystem::Ubuntu22 => "ubuntu-2204",
            OperatingSystem::Rhel7 => "centos-7",
            OperatingSystem::Rhel8 => "centos-8",
            OperatingSystem::Rhel9 => "rhel-9",
        }
    }

    /// Ubuntu release codename, used in Package Manager binary repository URLs.
    pub fn codename(&self) -> Option<&'static str> {
        match self {
            OperatingSystem::Ubuntu20 => Some("focal"),
            OperatingSystem::Ubuntu22 => Some("jammy"),
            OperatingSystem::Rhel7 | OperatingSystem::Rhel8 | OperatingSystem::Rhel9 => None,
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperatingSystem::Ubuntu20 => write!(f, "Ubuntu 20.04"),
            OperatingSystem::Ubuntu22 => write!(f, "Ubuntu 22.04"),
            OperatingSystem::Rhel7 => write!(f, "RHEL 7"),
            OperatingSystem::Rhel8 => write!(f, "RHEL 8"),
            OperatingSystem::Rhel9 => write!(f, "RHEL 9"),
        }
    }
}

/// Detects the host distribution from `/etc/redhat-release` or `/etc/issue`.
pub fn detect_os() -> Result<OperatingSystem, WbiError> {
    if !cfg!(target_os = "linux") {
        return Err(WbiError::UnsupportedOs(std::env::consts::OS.to_string()));
    }

    let redhat = read_if_present(Path::new(REDHAT_RELEASE))?;
    let issue = read_if_present(Path::new(ISSUE))?;
    let os = classify_release(redhat.as_deref(), issue.as_deref())?;
    log_debug!("[OS] Detected {}", os);
    Ok(os)
}

fn read_if_present(path: &Path) -> Result<Option<String>, WbiError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(WbiError::io("reading", path, e)),
    }
}

/// Classifies release-file contents. `/etc/redhat-release` wins when present.
pub fn classify_release(
    redhat_release: Option<&str>,
    issue: Option<&str>,
) -> Result<OperatingSystem, WbiError> {
    if let Some(release) = redhat_release {
        return if release.contains("release 7") {
            Ok(OperatingSystem::Rhel7)
        } else if release.contains("release 8") {
            Ok(OperatingSystem::Rhel8)
        } else if release.contains("release 9") {
            Ok(OperatingSystem::Rhel9)
        } else {
            Err(WbiError::UnsupportedOs(release.trim().to_string()))
        };
    }

    if let Some(issue) = issue {
        return if issue.contains("Ubuntu 20") {
            Ok(OperatingSystem::Ubuntu20)
        } else if issue.contains("Ubuntu 22") {
            Ok(OperatingSystem::Ubuntu22)
        } else {
            Err(WbiError::UnsupportedOs(issue.trim().to_string()))
        };
    }

    Err(WbiError::UnsupportedOs(
        "no /etc/redhat-release or /etc/issue found".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_rhel_family_release_strings() {
        let cases = [
            ("CentOS Linux release 7.9.2009 (Core)", OperatingSystem::Rhel7),
            ("Red Hat Enterprise Linux release 8.8 (Ootpa)", OperatingSystem::Rhel8),
            ("Rocky Linux release 9.2 (Blue Onyx)", OperatingSystem::Rhel9),
            ("AlmaLinux release 8.7 (Stone Smilodon)", OperatingSystem::Rhel8),
        ];
        for (release, expected) in cases {
            assert_eq!(classify_release(Some(release), None).unwrap(), expected);
        }
    }

    #[test]
    fn recognises_ubuntu_issue_strings() {
        assert_eq!(
            classify_release(None, Some("Ubuntu 20.04.6 LTS \\n \\l")).unwrap(),
            OperatingSystem::Ubuntu20
        );
        assert_eq!(
            classify_release(None, Some("Ubuntu 22.04.3 LTS \\n \\l")).unwrap(),
            OperatingSystem::Ubuntu22
        );
    }

    #[test]
    fn redhat_release_takes_precedence_over_issue() {
        let os = classify_release(Some("CentOS Linux release 7.9"), Some("Ubuntu 22.04")).unwrap();
        assert_eq!(os, OperatingSystem::Rhel7);
    }

    #[test]
    fn everything_else_is_unsupported() {
        for (redhat, issue) in [
            (Some("Fedora release 38 (Thirty Eight)"), None),
            (None, Some("Ubuntu 18.04.6 LTS")),
            (None, Some("Debian GNU/Linux 12")),
            (None, None),
        ] {
            let err = classify_release(redhat, issue).unwrap_err();
            assert!(matches!(err, WbiError::UnsupportedOs(_)));
        }
    }

    #[test]
    fn package_kinds_follow_the_family() {
        assert_eq!(OperatingSystem::Ubuntu22.package_kind(), PackageKind::Deb);
        assert_eq!(OperatingSystem::Rhel9.package_kind(), PackageKind::Rpm);
        assert_eq!(OperatingSystem::Ubuntu20.codename(), Some("focal"));
        assert_eq!(OperatingSystem::Rhel8.codename(), None);
    }
}
