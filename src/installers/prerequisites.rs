use crate::libs::os::OperatingSystem;

const EPEL_7: &str = "https://dl.fedoraproject.org/pub/epel/epel-release-latest-7.noarch.rpm";
const EPEL_8: &str = "https://dl.fedoraproject.org/pub/epel/epel-release-latest-8.noarch.rpm";
const EPEL_9: &str = "https://dl.fedoraproject.org/pub/epel/epel-release-latest-9.noarch.rpm";

/// Commands that prepare a host for installing R, Python and Workbench packages.
///
/// Ubuntu needs `gdebi` to resolve dependencies of local `.deb` files; RHEL-family
/// hosts need EPEL plus the version-specific optional / CodeReady repository.
pub fn commands(os: OperatingSystem) -> Vec<String> {
    match os {
        OperatingSystem::Ubuntu20 | OperatingSystem::Ubuntu22 => vec![
            "apt-get update".to_string(),
            "apt-get install -y gdebi-core".to_string(),
        ],
        OperatingSystem::Rhel7 => vec![
            "yum install -y yum-utils".to_string(),
            format!("yum install -y {EPEL_7}"),
            "yum-config-manager --enable \"rhel-*-optional-rpms\"".to_string(),
        ],
        OperatingSystem::Rhel8 => vec![
            "dnf install -y dnf-plugins-core".to_string(),
            format!("dnf install -y {EPEL_8}"),
            "dnf config-manager --set-enabled codeready-builder-for-rhel-8-x86_64-rpms".to_string(),
        ],
        OperatingSystem::Rhel9 => vec![
            "dnf install -y dnf-plugins-core".to_string(),
            format!("dnf install -y {EPEL_9}"),
            "dnf config-manager --set-enabled codeready-builder-for-rhel-9-x86_64-rpms".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ubuntu_gets_gdebi() {
        assert_eq!(
            commands(OperatingSystem::Ubuntu20),
            vec!["apt-get update", "apt-get install -y gdebi-core"]
        );
    }

    #[test]
    fn rhel_repos_are_version_specific() {
        let rhel8 = commands(OperatingSystem::Rhel8).join("\n");
        assert!(rhel8.contains("epel-release-latest-8"));
        assert!(rhel8.contains("codeready-builder-for-rhel-8-x86_64-rpms"));

        let rhel9 = commands(OperatingSystem::Rhel9).join("\n");
        assert!(rhel9.contains("epel-release-latest-9"));
        assert!(!rhel9.contains("rhel-8"));

        let rhel7 = commands(OperatingSystem::Rhel7).join("\n");
        assert!(rhel7.contains("rhel-*-optional-rpms"));
    }
}
