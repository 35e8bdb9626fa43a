// Checks that integration endpoints and local setup are usable before (or after)
// they are written into Workbench's configuration.

use crate::cli::type_enums::RepoLanguage;
use crate::errors::WbiError;
use crate::libs::http::{self, VERIFY_TIMEOUT};
use crate::libs::os::OperatingSystem;
use crate::libs::system::{Executor, shell_quote};
use crate::{log_debug, log_info};
use colored::Colorize;
use serde::Deserialize;
use std::path::Path;

/// One repository as listed by Package Manager's `/__api__/repos`.
#[derive(Debug, Deserialize)]
pub struct PackageManagerRepo {
    pub name: String,
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// The part of Connect's `/__api__/server_settings` we report back.
#[derive(Debug, Deserialize)]
pub struct ConnectServerSettings {
    #[serde(default)]
    pub version: Option<String>,
}

fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Confirms a Package Manager instance answers at `url`.
pub fn verify_package_manager(url: &str) -> Result<(), WbiError> {
    http::check_status(&format!("{}/__api__/status", trim_base(url)))?;
    log_info!("Posit Package Manager URL {} is reachable", url.green());
    Ok(())
}

/// Confirms `repo` exists on the Package Manager at `url` and serves `language`,
/// returning the repository URL to configure.
pub fn verify_package_manager_repo(
    url: &str,
    repo: &str,
    language: RepoLanguage,
    os: Option<OperatingSystem>,
) -> Result<String, WbiError> {
    let base = trim_base(url);
    let repos: Vec<PackageManagerRepo> = http::get_json(&format!("{base}/__api__/repos"), VERIFY_TIMEOUT)?;

    let found = repos
        .iter()
        .find(|r| r.name == repo)
        .ok_or_else(|| WbiError::validation(format!("the repository {repo} was not found in Posit Package Manager")))?;

    if found.repo_type != language.repo_type() {
        return Err(WbiError::validation(format!(
            "the repository {} is a {} repository, not {}",
            repo,
            found.repo_type,
            language.repo_type()
        )));
    }

    let repo_url = repository_url(base, repo, language, os);
    log_info!("Repository {} verified: {}", repo.bold(), repo_url.green());
    Ok(repo_url)
}

/// URL Workbench and pip should use for a Package Manager repository.
///
/// R on Ubuntu gets the binary (`__linux__/<codename>`) endpoint; RHEL and unknown
/// hosts get the source endpoint. Python repos use the `simple` index.
pub fn repository_url(base: &str, repo: &str, language: RepoLanguage, os: Option<OperatingSystem>) -> String {
    let base = trim_base(base);
    match language {
        RepoLanguage::R => match os.and_then(|os| os.codename()) {
            Some(codename) => format!("{base}/{repo}/__linux__/{codename}/latest"),
            None => format!("{base}/{repo}/latest"),
        },
        RepoLanguage::Python => format!("{base}/{repo}/latest/simple"),
    }
}

/// Confirms a Connect server answers at `url`, returning its version when reported.
pub fn verify_connect_url(url: &str) -> Result<Option<String>, WbiError> {
    let settings: ConnectServerSettings =
        http::get_json(&format!("{}/__api__/server_settings", trim_base(url)), VERIFY_TIMEOUT)?;
    match &settings.version {
        Some(version) => log_info!("Connect {} found at {}", version.bold(), url.green()),
        None => log_info!("Connect found at {}", url.green()),
    }
    Ok(settings.version)
}

/// Checks the certificate has not expired and that it belongs to the key.
pub fn verify_ssl(executor: &Executor, cert: &Path, key: &Path) -> Result<(), WbiError> {
    for file in [cert, key] {
        if !file.is_file() {
            return Err(WbiError::MissingFile(file.to_path_buf()));
        }
    }

    let (cert_arg, key_arg) = (
        shell_quote(&cert.to_string_lossy()),
        shell_quote(&key.to_string_lossy()),
    );
    executor.run(&format!("openssl x509 -noout -checkend 0 -in {cert_arg}"), false)?;

    let cert_digest = executor.run(
        &format!("openssl x509 -noout -modulus -in {cert_arg} | openssl md5"),
        false,
    )?;
    let key_digest = executor.run(
        &format!("openssl rsa -noout -modulus -in {key_arg} | openssl md5"),
        false,
    )?;
    log_debug!("[Verify] cert digest {} / key digest {}", cert_digest.trim(), key_digest.trim());

    if cert_digest.trim() != key_digest.trim() {
        return Err(WbiError::validation(format!(
            "the certificate {} does not match the key {}",
            cert.display(),
            key.display()
        )));
    }

    log_info!("SSL certificate and key verified");
    Ok(())
}

pub fn verify_workbench(executor: &Executor) -> Result<(), WbiError> {
    executor.run("rstudio-server verify-installation", true)?;
    log_info!("Workbench installation verified");
    Ok(())
}

pub fn verify_license(executor: &Executor) -> Result<(), WbiError> {
    let output = executor.run("rstudio-server license-manager status", false)?;
    if !license_is_activated(&output) {
        return Err(WbiError::validation("the Workbench license is not activated"));
    }
    log_info!("Workbench license is activated");
    Ok(())
}

fn license_is_activated(status_output: &str) -> bool {
    status_output.contains("Activated")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::CommandTranscript;

    const REPOS: &str = r#"[
        {"id": 1, "name": "cran", "type": "R"},
        {"id": 2, "name": "pypi", "type": "Python"},
        {"id": 3, "name": "bioconductor", "type": "Bioconductor"}
    ]"#;

    #[test]
    fn package_manager_status_is_checked() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/__api__/status").with_status(200).create();

        verify_package_manager(&format!("{}/", server.url())).unwrap();
        mock.assert();
    }

    #[test]
    fn unreachable_package_manager_is_a_transport_error() {
        let err = verify_package_manager("http://127.0.0.1:1").unwrap_err();
        assert!(matches!(err, WbiError::Http { .. }));
    }

    #[test]
    fn repo_lookup_checks_name_and_type() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/__api__/repos")
            .with_status(200)
            .with_body(REPOS)
            .create();
        let url = server.url();

        let repo_url =
            verify_package_manager_repo(&url, "pypi", RepoLanguage::Python, Some(OperatingSystem::Ubuntu22)).unwrap();
        assert_eq!(repo_url, format!("{url}/pypi/latest/simple"));

        let err = verify_package_manager_repo(&url, "pypi", RepoLanguage::R, None).unwrap_err();
        assert_eq!(err.to_string(), "the repository pypi is a Python repository, not R");

        let err = verify_package_manager_repo(&url, "missing", RepoLanguage::R, None).unwrap_err();
        assert_eq!(err.to_string(), "the repository missing was not found in Posit Package Manager");
    }

    #[test]
    fn r_repositories_use_binaries_on_ubuntu_only() {
        let base = "https://pm.example.com/";
        assert_eq!(
            repository_url(base, "cran", RepoLanguage::R, Some(OperatingSystem::Ubuntu22)),
            "https://pm.example.com/cran/__linux__/jammy/latest"
        );
        assert_eq!(
            repository_url(base, "cran", RepoLanguage::R, Some(OperatingSystem::Rhel9)),
            "https://pm.example.com/cran/latest"
        );
        assert_eq!(
            repository_url(base, "cran", RepoLanguage::R, None),
            "https://pm.example.com/cran/latest"
        );
    }

    #[test]
    fn connect_version_is_reported_when_present() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/__api__/server_settings")
            .with_status(200)
            .with_body(r#"{"version": "2023.09.0", "license": {}}"#)
            .create();

        assert_eq!(verify_connect_url(&server.url()).unwrap().as_deref(), Some("2023.09.0"));
    }

    #[test]
    fn connect_without_version_still_verifies() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/__api__/server_settings")
            .with_status(200)
            .with_body("{}")
            .create();

        assert_eq!(verify_connect_url(&server.url()).unwrap(), None);
    }

    #[test]
    fn ssl_verification_requires_both_files() {
        let transcript = CommandTranscript::disabled();
        let executor = Executor::new(&transcript);
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("wb.crt");
        std::fs::write(&cert, "cert").unwrap();

        let err = verify_ssl(&executor, &cert, &dir.path().join("wb.key")).unwrap_err();
        assert!(matches!(err, WbiError::MissingFile(_)));
    }

    #[test]
    fn ssl_paths_with_spaces_are_quoted() {
        let transcript = CommandTranscript::disabled();
        let executor = Executor::new(&transcript);
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("my cert.pem");
        let key = dir.path().join("my key.pem");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        // Garbage contents make openssl fail on the first command.
        match verify_ssl(&executor, &cert, &key).unwrap_err() {
            WbiError::Command { command, .. } => {
                assert!(command.ends_with(&format!("-in '{}'", cert.display())), "{command}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn license_status_parsing() {
        assert!(license_is_activated("Status: Activated\nProduct-Key: XXXX"));
        assert!(!license_is_activated("Status: Evaluation (5 days left)"));
    }
}
