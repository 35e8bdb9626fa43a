// `wbi verify <item>`: read-only checks against Package Manager, Connect, and the
// local Workbench install. Needs no root.

use crate::cli::cmd_enums::VerifyArgs;
use crate::cli::type_enums::{RepoLanguage, VerifyItem};
use crate::commands::validation;
use crate::errors::WbiError;
use crate::libs::os::detect_os;
use crate::libs::system::Executor;
use crate::libs::utilities::path_helpers::expand_tilde;
use crate::libs::verification;
use crate::log_debug;
use crate::logger::Logger;
use anyhow::Context;
use std::path::PathBuf;

const URL_ONLY: &str = "the url flag is only supported for packagemanager and connect-url";
const REPO_ONLY: &str = "the repo flag is only supported for packagemanager";
const LANGUAGE_ONLY: &str = "the language flag is only supported for packagemanager";
const CERT_ONLY: &str = "the cert-path flag is only supported for ssl";
const KEY_ONLY: &str = "the key-path flag is only supported for ssl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyRequest {
    PackageManager {
        url: String,
        repo: Option<(String, RepoLanguage)>,
    },
    ConnectUrl { url: String },
    Workbench,
    Ssl { cert: PathBuf, key: PathBuf },
    License,
}

pub fn validate(args: &VerifyArgs) -> Result<VerifyRequest, WbiError> {
    let item: VerifyItem = validation::parse_item(&args.args)?;

    if item != VerifyItem::PackageManager {
        validation::forbid(&args.repo, REPO_ONLY)?;
        validation::forbid(&args.language, LANGUAGE_ONLY)?;
    }
    if item != VerifyItem::Ssl {
        validation::forbid(&args.cert_path, CERT_ONLY)?;
        validation::forbid(&args.key_path, KEY_ONLY)?;
    }
    if !matches!(item, VerifyItem::PackageManager | VerifyItem::ConnectUrl) {
        validation::forbid(&args.url, URL_ONLY)?;
    }

    match item {
        VerifyItem::PackageManager => {
            let url = validation::require(&args.url, "the url flag is required for packagemanager")?;
            let repo = match (&args.repo, &args.language) {
                (None, None) => None,
                (Some(repo), Some(language)) => {
                    let language = language.parse::<RepoLanguage>().map_err(WbiError::Validation)?;
                    Some((repo.clone(), language))
                }
                _ => {
                    return Err(WbiError::validation(
                        "the repo and language flags must be provided together",
                    ));
                }
            };
            Ok(VerifyRequest::PackageManager {
                url: url.to_string(),
                repo,
            })
        }
        VerifyItem::ConnectUrl => {
            let url = validation::require(&args.url, "the url flag is required for connect-url")?;
            Ok(VerifyRequest::ConnectUrl { url: url.to_string() })
        }
        VerifyItem::Workbench => Ok(VerifyRequest::Workbench),
        VerifyItem::Ssl => {
            let cert = validation::require(&args.cert_path, "the cert-path flag is required for ssl")?;
            let key = validation::require(&args.key_path, "the key-path flag is required for ssl")?;
            Ok(VerifyRequest::Ssl {
                cert: expand_tilde(cert),
                key: expand_tilde(key),
            })
        }
        VerifyItem::License => Ok(VerifyRequest::License),
    }
}

pub fn run(request: VerifyRequest, logger: &Logger) -> anyhow::Result<()> {
    let executor = Executor::new(logger.transcript());

    match request {
        VerifyRequest::PackageManager { url, repo } => {
            verification::verify_package_manager(&url).context("verifying Posit Package Manager")?;
            if let Some((repo, language)) = repo {
                // Only picks Ubuntu binary URLs; any other host gets the source URL.
                let os = detect_os().ok();
                log_debug!("[Verify] Host OS for repository URL: {:?}", os);
                let repo_url = verification::verify_package_manager_repo(&url, &repo, language, os)
                    .with_context(|| format!("verifying repository {repo}"))?;
                println!("{repo_url}");
            }
        }
        VerifyRequest::ConnectUrl { url } => {
            verification::verify_connect_url(&url).context("verifying Posit Connect")?;
        }
        VerifyRequest::Workbench => {
            verification::verify_workbench(&executor).context("verifying Workbench")?;
        }
        VerifyRequest::Ssl { cert, key } => {
            verification::verify_ssl(&executor, &cert, &key).context("verifying SSL")?;
        }
        VerifyRequest::License => {
            verification::verify_license(&executor).context("verifying the Workbench license")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::type_enums::LogLevel;

    fn verify_args(item: &str) -> VerifyArgs {
        VerifyArgs {
            args: vec![item.to_string()],
            ..Default::default()
        }
    }

    fn message(args: &VerifyArgs) -> String {
        validate(args).unwrap_err().to_string()
    }

    #[test]
    fn packagemanager_needs_a_url() {
        assert_eq!(
            message(&verify_args("packagemanager")),
            "the url flag is required for packagemanager"
        );
    }

    #[test]
    fn unreachable_packagemanager_is_a_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::init(LogLevel::Info, dir.path()).unwrap();
        let args = VerifyArgs {
            url: Some("http://127.0.0.1:1".to_string()),
            ..verify_args("packagemanager")
        };
        let err = run(validate(&args).unwrap(), &logger).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.starts_with("verifying Posit Package Manager"));
        assert!(chain.contains("error making request to http://127.0.0.1:1/__api__/status"));
    }

    #[test]
    fn repo_and_language_come_together() {
        let args = VerifyArgs {
            url: Some("https://pm.example.com".to_string()),
            repo: Some("cran".to_string()),
            ..verify_args("packagemanager")
        };
        assert_eq!(message(&args), "the repo and language flags must be provided together");

        let args = VerifyArgs {
            language: Some("julia".to_string()),
            ..args
        };
        assert_eq!(message(&args), "the language flag only allows r and python");

        let args = VerifyArgs {
            language: Some("python".to_string()),
            ..args
        };
        assert_eq!(
            validate(&args).unwrap(),
            VerifyRequest::PackageManager {
                url: "https://pm.example.com".to_string(),
                repo: Some(("cran".to_string(), RepoLanguage::Python)),
            }
        );
    }

    #[test]
    fn flags_outside_their_item_are_rejected() {
        let args = VerifyArgs {
            url: Some("https://wb.example.com".to_string()),
            ..verify_args("workbench")
        };
        assert_eq!(message(&args), URL_ONLY);

        let args = VerifyArgs {
            repo: Some("cran".to_string()),
            ..verify_args("connect-url")
        };
        assert_eq!(message(&args), REPO_ONLY);

        let args = VerifyArgs {
            language: Some("r".to_string()),
            ..verify_args("license")
        };
        assert_eq!(message(&args), LANGUAGE_ONLY);

        let args = VerifyArgs {
            cert_path: Some("/a.crt".to_string()),
            url: Some("https://pm.example.com".to_string()),
            ..verify_args("packagemanager")
        };
        assert_eq!(message(&args), CERT_ONLY);
    }

    #[test]
    fn ssl_needs_both_files() {
        assert_eq!(message(&verify_args("ssl")), "the cert-path flag is required for ssl");
        let args = VerifyArgs {
            cert_path: Some("/a.crt".to_string()),
            ..verify_args("ssl")
        };
        assert_eq!(message(&args), "the key-path flag is required for ssl");
    }

    #[test]
    fn connect_url_needs_a_url() {
        assert_eq!(message(&verify_args("connect-url")), "the url flag is required for connect-url");
    }
}
