// `wbi config <item>`: append SSL, package repository, or Connect URL settings to
// Workbench's config files. Each write refuses to run twice (see `config_writer`).

use crate::cli::cmd_enums::ConfigArgs;
use crate::cli::type_enums::{ConfigItem, RepoSource};
use crate::commands::validation;
use crate::errors::WbiError;
use crate::libs::config_writer::{ConfigBlock, write_block};
use crate::libs::paths::ConfigPaths;
use crate::libs::privileges::require_root;
use crate::libs::utilities::path_helpers::existing_file;
use crate::log_info;
use anyhow::Context;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigRequest {
    /// `url` is only echoed back once SSL is on.
    Ssl { cert: PathBuf, key: PathBuf, url: Option<String> },
    Repo { url: String, source: RepoSource },
    ConnectUrl { url: String },
}

pub fn validate(args: &ConfigArgs) -> Result<ConfigRequest, WbiError> {
    let item: ConfigItem = validation::parse_item(&args.args)?;

    match item {
        ConfigItem::Ssl => {
            validation::forbid(&args.source, "the source flag is only supported for repo")?;
            let cert = validation::require(&args.cert_path, "the cert-path flag is required for ssl")?;
            let key = validation::require(&args.key_path, "the key-path flag is required for ssl")?;
            let url = match args.url.as_deref() {
                Some(url) if !url.starts_with("https://") => {
                    return Err(WbiError::validation("the url flag must be an https URL for ssl"));
                }
                other => other.map(str::to_string),
            };
            Ok(ConfigRequest::Ssl {
                cert: existing_file(cert)?,
                key: existing_file(key)?,
                url,
            })
        }
        ConfigItem::Repo => {
            validation::forbid(&args.cert_path, "the cert-path flag is only supported for ssl")?;
            validation::forbid(&args.key_path, "the key-path flag is only supported for ssl")?;
            let url = validation::require(&args.url, "the url flag is required for repo")?;
            let source = validation::require(&args.source, "the source flag is required for repo")?
                .parse::<RepoSource>()
                .map_err(WbiError::Validation)?;
            Ok(ConfigRequest::Repo {
                url: url.to_string(),
                source,
            })
        }
        ConfigItem::ConnectUrl => {
            validation::forbid(&args.cert_path, "the cert-path flag is only supported for ssl")?;
            validation::forbid(&args.key_path, "the key-path flag is only supported for ssl")?;
            validation::forbid(&args.source, "the source flag is only supported for repo")?;
            let url = validation::require(&args.url, "the url flag is required for connect-url")?;
            Ok(ConfigRequest::ConnectUrl { url: url.to_string() })
        }
    }
}

/// Writes the block for `request` into the files named by `paths`.
pub fn apply(request: &ConfigRequest, paths: &ConfigPaths) -> Result<(), WbiError> {
    match request {
        ConfigRequest::Ssl { cert, key, url } => {
            write_block(&ConfigBlock::ssl(paths, cert, key))?;
            if let Some(url) = url {
                log_info!("Workbench will be served at {}", url.green());
            }
        }
        ConfigRequest::Repo { url, source } => {
            let block = match source {
                RepoSource::Cran => ConfigBlock::cran_repo(paths, url),
                RepoSource::Pypi => ConfigBlock::pypi_repo(paths, url),
            };
            write_block(&block)?;
        }
        ConfigRequest::ConnectUrl { url } => write_block(&ConfigBlock::connect_url(paths, url))?,
    }
    Ok(())
}

pub fn run(request: ConfigRequest) -> anyhow::Result<()> {
    require_root()?;
    apply(&request, &ConfigPaths::default()).context("writing Workbench configuration")?;
    log_info!("Restart Workbench for the change to take effect: {}", "rstudio-server restart".cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_args(item: &str) -> ConfigArgs {
        ConfigArgs {
            args: vec![item.to_string()],
            ..Default::default()
        }
    }

    fn message(args: &ConfigArgs) -> String {
        validate(args).unwrap_err().to_string()
    }

    #[test]
    fn ssl_writes_three_lines_to_rserver_conf() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.crt");
        let key = dir.path().join("cert.key");
        fs::write(&cert, "cert").unwrap();
        fs::write(&key, "key").unwrap();

        let args = ConfigArgs {
            cert_path: Some(cert.display().to_string()),
            key_path: Some(key.display().to_string()),
            url: Some("https://host".to_string()),
            ..config_args("ssl")
        };
        let request = validate(&args).unwrap();

        let paths = ConfigPaths::rooted_at(dir.path());
        apply(&request, &paths).unwrap();

        let written = fs::read_to_string(&paths.rserver).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ssl-enabled=1");
        assert!(lines[1].starts_with("ssl-certificate=") && lines[1].ends_with("cert.crt"));
        assert!(lines[2].starts_with("ssl-certificate-key=") && lines[2].ends_with("cert.key"));
    }

    #[test]
    fn ssl_flag_matrix() {
        assert_eq!(message(&config_args("ssl")), "the cert-path flag is required for ssl");

        let args = ConfigArgs {
            cert_path: Some("/a.crt".to_string()),
            ..config_args("ssl")
        };
        assert_eq!(message(&args), "the key-path flag is required for ssl");

        let args = ConfigArgs {
            cert_path: Some("/a.crt".to_string()),
            key_path: Some("/a.key".to_string()),
            url: Some("http://host".to_string()),
            ..config_args("ssl")
        };
        assert_eq!(message(&args), "the url flag must be an https URL for ssl");

        let args = ConfigArgs {
            source: Some("cran".to_string()),
            ..config_args("ssl")
        };
        assert_eq!(message(&args), "the source flag is only supported for repo");
    }

    #[test]
    fn repo_accepts_cran_and_rejects_npm() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::rooted_at(dir.path());

        let args = ConfigArgs {
            url: Some("https://pm.example.com".to_string()),
            source: Some("cran".to_string()),
            ..config_args("repo")
        };
        let request = validate(&args).unwrap();
        apply(&request, &paths).unwrap();
        assert_eq!(fs::read_to_string(&paths.repos).unwrap(), "CRAN=https://pm.example.com\n");

        let args = ConfigArgs {
            source: Some("npm".to_string()),
            ..args
        };
        assert_eq!(message(&args), "the source flag only allows cran and pypi");
    }

    #[test]
    fn repo_flag_matrix() {
        assert_eq!(message(&config_args("repo")), "the url flag is required for repo");

        let args = ConfigArgs {
            url: Some("https://pm.example.com".to_string()),
            ..config_args("repo")
        };
        assert_eq!(message(&args), "the source flag is required for repo");

        let args = ConfigArgs {
            cert_path: Some("/a.crt".to_string()),
            ..config_args("repo")
        };
        assert_eq!(message(&args), "the cert-path flag is only supported for ssl");
    }

    #[test]
    fn pypi_repo_goes_to_pip_conf() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::rooted_at(dir.path());
        let request = ConfigRequest::Repo {
            url: "https://pm.example.com/pypi/latest/simple".to_string(),
            source: RepoSource::Pypi,
        };
        apply(&request, &paths).unwrap();
        assert!(fs::read_to_string(&paths.pip).unwrap().contains("index-url = https://pm.example.com"));
    }

    #[test]
    fn connect_url_flag_matrix() {
        assert_eq!(message(&config_args("connect-url")), "the url flag is required for connect-url");

        let args = ConfigArgs {
            key_path: Some("/a.key".to_string()),
            ..config_args("connect-url")
        };
        assert_eq!(message(&args), "the key-path flag is only supported for ssl");

        let args = ConfigArgs {
            url: Some("https://connect.example.com".to_string()),
            ..config_args("connect-url")
        };
        assert_eq!(
            validate(&args).unwrap(),
            ConfigRequest::ConnectUrl {
                url: "https://connect.example.com".to_string()
            }
        );
    }

    #[test]
    fn second_connect_url_write_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::rooted_at(dir.path());
        let request = ConfigRequest::ConnectUrl {
            url: "https://connect.example.com".to_string(),
        };
        apply(&request, &paths).unwrap();
        let err = apply(&request, &paths).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
