// Appends fixed-format settings to Workbench's plain-text config files.
//
// Writes append (or, for a block opening with a `[section]` the file already has,
// insert under that header) and refuse to run twice: each kind of block has a marker key,
// and if the target file already has that key the write fails with `AlreadyExists`
// and the file is left untouched. Presence is checked on parsed `key=value` lines
// (comments and section headers skipped, whitespace around `=` ignored), so the
// check does not depend on how an existing line was formatted.
//
// Write failures always propagate to the caller.

use crate::errors::WbiError;
use crate::libs::paths::ConfigPaths;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Every kind of block `wbi` knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Ssl,
    CranRepo,
    PypiRepo,
    ConnectUrl,
    Jupyter,
    Saml,
    Oidc,
    OidcClientSecret,
    PythonPath,
}

impl ConfigKind {
    /// Key whose presence in the target file means this block was already written.
    pub fn marker(&self) -> &'static str {
        match self {
            ConfigKind::Ssl => "ssl-enabled",
            ConfigKind::CranRepo => "CRAN",
            ConfigKind::PypiRepo => "index-url",
            ConfigKind::ConnectUrl => "default-rsconnect-server",
            ConfigKind::Jupyter => "jupyter-exe",
            ConfigKind::Saml => "auth-saml",
            ConfigKind::Oidc => "auth-openid",
            ConfigKind::OidcClientSecret => "client-id",
            ConfigKind::PythonPath => "export PATH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigKind::Ssl => "SSL",
            ConfigKind::CranRepo => "CRAN repository",
            ConfigKind::PypiRepo => "PyPI repository",
            ConfigKind::ConnectUrl => "Connect URL",
            ConfigKind::Jupyter => "Jupyter",
            ConfigKind::Saml => "SAML authentication",
            ConfigKind::Oidc => "OpenID Connect authentication",
            ConfigKind::OidcClientSecret => "OpenID Connect client secret",
            ConfigKind::PythonPath => "Python PATH",
        }
    }

    /// Files holding credentials are restricted to their owner.
    fn private(&self) -> bool {
        matches!(self, ConfigKind::OidcClientSecret)
    }
}

/// A rendered block of config lines and the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    pub kind: ConfigKind,
    pub target: PathBuf,
    pub lines: Vec<String>,
}

impl ConfigBlock {
    pub fn ssl(paths: &ConfigPaths, cert: &Path, key: &Path) -> Self {
        ConfigBlock {
            kind: ConfigKind::Ssl,
            target: paths.rserver.clone(),
            lines: vec![
                "ssl-enabled=1".to_string(),
                format!("ssl-certificate={}", cert.display()),
                format!("ssl-certificate-key={}", key.display()),
            ],
        }
    }

    pub fn cran_repo(paths: &ConfigPaths, url: &str) -> Self {
        ConfigBlock {
            kind: ConfigKind::CranRepo,
            target: paths.repos.clone(),
            lines: vec![format!("CRAN={url}")],
        }
    }

    pub fn pypi_repo(paths: &ConfigPaths, url: &str) -> Self {
        ConfigBlock {
            kind: ConfigKind::PypiRepo,
            target: paths.pip.clone(),
            lines: vec!["[global]".to_string(), format!("index-url = {url}")],
        }
    }

    pub fn connect_url(paths: &ConfigPaths, url: &str) -> Self {
        ConfigBlock {
            kind: ConfigKind::ConnectUrl,
            target: paths.rsession.clone(),
            lines: vec![format!("default-rsconnect-server={url}")],
        }
    }

    pub fn jupyter(paths: &ConfigPaths, jupyter_exe: &Path) -> Self {
        ConfigBlock {
            kind: ConfigKind::Jupyter,
            target: paths.jupyter.clone(),
            lines: vec![
                format!("jupyter-exe={}", jupyter_exe.display()),
                "notebooks-enabled=1".to_string(),
                "labs-enabled=1".to_string(),
            ],
        }
    }

    pub fn saml(paths: &ConfigPaths, metadata_url: &str, username_attribute: Option<&str>) -> Self {
        let mut lines = vec![
            "auth-saml=1".to_string(),
            format!("auth-saml-metadata-url={metadata_url}"),
        ];
        if let Some(attribute) = username_attribute {
            lines.push(format!("auth-saml-sp-attribute-username={attribute}"));
        }
        ConfigBlock {
            kind: ConfigKind::Saml,
            target: paths.rserver.clone(),
            lines,
        }
    }

    pub fn oidc(paths: &ConfigPaths, issuer: &str, username_claim: Option<&str>) -> Self {
        let mut lines = vec![
            "auth-openid=1".to_string(),
            format!("auth-openid-issuer={issuer}"),
        ];
        if let Some(claim) = username_claim {
            lines.push(format!("auth-openid-username-claim={claim}"));
        }
        ConfigBlock {
            kind: ConfigKind::Oidc,
            target: paths.rserver.clone(),
            lines,
        }
    }

    pub fn oidc_client_secret(paths: &ConfigPaths, client_id: &str, client_secret: &str) -> Self {
        ConfigBlock {
            kind: ConfigKind::OidcClientSecret,
            target: paths.openid_client_secret.clone(),
            lines: vec![
                format!("client-id={client_id}"),
                format!("client-secret={client_secret}"),
            ],
        }
    }

    pub fn python_path(paths: &ConfigPaths, python_bin_dir: &Path) -> Self {
        ConfigBlock {
            kind: ConfigKind::PythonPath,
            target: paths.python_profile.clone(),
            lines: vec![format!("export PATH={}:$PATH", python_bin_dir.display())],
        }
    }
}

/// Keys and `[section]` headers present in a config file, in file order.
#[derive(Debug, Default)]
pub struct ConfigFile {
    keys: Vec<String>,
    sections: Vec<String>,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Self {
        let mut file = ConfigFile::default();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if is_section_header(line) {
                file.sections.push(line.to_string());
                continue;
            }
            let key = match line.split_once('=') {
                Some((key, _)) => key.trim(),
                None => line,
            };
            file.keys.push(key.to_string());
        }
        file
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn contains_section(&self, header: &str) -> bool {
        self.sections.iter().any(|s| s == header)
    }
}

fn is_section_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

/// Puts `body` directly under the first `header` line of `existing`.
fn insert_into_section(existing: &str, header: &str, body: &[String]) -> String {
    let mut merged = String::with_capacity(existing.len() + body.iter().map(|l| l.len() + 1).sum::<usize>());
    let mut inserted = false;
    for line in existing.split_inclusive('\n') {
        merged.push_str(line);
        if !inserted && line.trim() == header {
            if !line.ends_with('\n') {
                merged.push('\n');
            }
            for body_line in body {
                merged.push_str(body_line);
                merged.push('\n');
            }
            inserted = true;
        }
    }
    merged
}

/// Appends `block` to its target unless the marker key is already there.
///
/// A missing target file (and its parent directories) is created.
pub fn write_block(block: &ConfigBlock) -> Result<(), WbiError> {
    let existing = match fs::read_to_string(&block.target) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(WbiError::io("reading", &block.target, e)),
    };

    let marker = block.kind.marker();
    let parsed = ConfigFile::parse(&existing);
    if parsed.contains_key(marker) {
        return Err(WbiError::AlreadyExists {
            marker: marker.to_string(),
            file: block.target.clone(),
        });
    }

    if let Some(parent) = block.target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| WbiError::io("creating", parent, e))?;
        }
    }

    // Never repeat a `[section]` header the file already has.
    match block.lines.split_first() {
        Some((header, body)) if is_section_header(header) && parsed.contains_section(header) => {
            let merged = insert_into_section(&existing, header, body);
            fs::write(&block.target, merged).map_err(|e| WbiError::io("writing", &block.target, e))?;
        }
        _ => append_lines(&block.target, &existing, &block.lines)?,
    }

    if block.kind.private() {
        restrict_permissions(&block.target)?;
    }

    log_debug!("[Config] Wrote {} line(s) for marker '{}'", block.lines.len(), marker);
    log_info!(
        "=== {} configuration written to {}",
        block.kind.label().bold(),
        block.target.display().to_string().green()
    );
    Ok(())
}

fn append_lines(target: &Path, existing: &str, lines: &[String]) -> Result<(), WbiError> {
    let mut rendered = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        rendered.push('\n');
    }
    for line in lines {
        rendered.push_str(line);
        rendered.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target)
        .map_err(|e| WbiError::io("opening", target, e))?;
    file.write_all(rendered.as_bytes())
        .map_err(|e| WbiError::io("writing", target, e))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), WbiError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| WbiError::io("setting permissions on", path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), WbiError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, ConfigPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::rooted_at(dir.path());
        (dir, paths)
    }

    #[test]
    fn ssl_block_appends_three_lines() {
        let (_dir, paths) = scratch();
        let block = ConfigBlock::ssl(&paths, Path::new("/etc/ssl/wb.crt"), Path::new("/etc/ssl/wb.key"));
        write_block(&block).unwrap();

        let contents = fs::read_to_string(&paths.rserver).unwrap();
        assert_eq!(
            contents,
            "ssl-enabled=1\nssl-certificate=/etc/ssl/wb.crt\nssl-certificate-key=/etc/ssl/wb.key\n"
        );
    }

    #[test]
    fn second_identical_write_is_refused_and_file_is_unchanged() {
        let (_dir, paths) = scratch();
        let block = ConfigBlock::cran_repo(&paths, "https://pm.example.com/cran/latest");

        write_block(&block).unwrap();
        let after_first = fs::read_to_string(&paths.repos).unwrap();

        let err = write_block(&block).unwrap_err();
        assert!(matches!(err, WbiError::AlreadyExists { .. }));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&paths.repos).unwrap(), after_first);
    }

    #[test]
    fn marker_detection_ignores_formatting() {
        let (_dir, paths) = scratch();
        fs::create_dir_all(paths.rserver.parent().unwrap()).unwrap();
        fs::write(&paths.rserver, "# managed by hand\nssl-enabled = 1\n").unwrap();

        let block = ConfigBlock::ssl(&paths, Path::new("/a.crt"), Path::new("/a.key"));
        assert!(matches!(write_block(&block), Err(WbiError::AlreadyExists { .. })));
    }

    #[test]
    fn commented_out_marker_does_not_count() {
        let (_dir, paths) = scratch();
        fs::create_dir_all(paths.rsession.parent().unwrap()).unwrap();
        fs::write(&paths.rsession, "#default-rsconnect-server=https://old").unwrap();

        write_block(&ConfigBlock::connect_url(&paths, "https://connect.example.com")).unwrap();
        assert_eq!(
            fs::read_to_string(&paths.rsession).unwrap(),
            "#default-rsconnect-server=https://old\ndefault-rsconnect-server=https://connect.example.com\n"
        );
    }

    #[test]
    fn different_kinds_share_a_file() {
        let (_dir, paths) = scratch();
        write_block(&ConfigBlock::ssl(&paths, Path::new("/a.crt"), Path::new("/a.key"))).unwrap();
        write_block(&ConfigBlock::saml(&paths, "https://idp/metadata", Some("email"))).unwrap();
        write_block(&ConfigBlock::oidc(&paths, "https://issuer", None)).unwrap();

        let file = ConfigFile::parse(&fs::read_to_string(&paths.rserver).unwrap());
        for key in [
            "ssl-enabled",
            "auth-saml",
            "auth-saml-sp-attribute-username",
            "auth-openid",
            "auth-openid-issuer",
        ] {
            assert!(file.contains_key(key), "missing {key}");
        }
        assert!(!file.contains_key("auth-openid-username-claim"));
    }

    #[test]
    fn pypi_block_is_detected_under_a_section_header() {
        let (_dir, paths) = scratch();
        write_block(&ConfigBlock::pypi_repo(&paths, "https://pm.example.com/pypi/latest/simple")).unwrap();
        assert_eq!(
            fs::read_to_string(&paths.pip).unwrap(),
            "[global]\nindex-url = https://pm.example.com/pypi/latest/simple\n"
        );
        let again = ConfigBlock::pypi_repo(&paths, "https://elsewhere/simple");
        assert!(matches!(write_block(&again), Err(WbiError::AlreadyExists { .. })));
    }

    #[test]
    fn pypi_block_joins_an_existing_global_section() {
        let (_dir, paths) = scratch();
        fs::create_dir_all(paths.pip.parent().unwrap()).unwrap();
        fs::write(&paths.pip, "[global]\ntimeout = 60\n").unwrap();

        write_block(&ConfigBlock::pypi_repo(&paths, "https://pm.example.com/pypi/latest/simple")).unwrap();

        let contents = fs::read_to_string(&paths.pip).unwrap();
        assert_eq!(contents.matches("[global]").count(), 1);
        assert_eq!(
            contents,
            "[global]\nindex-url = https://pm.example.com/pypi/latest/simple\ntimeout = 60\n"
        );
    }

    #[test]
    fn pypi_block_gets_its_own_header_next_to_other_sections() {
        let (_dir, paths) = scratch();
        fs::create_dir_all(paths.pip.parent().unwrap()).unwrap();
        fs::write(&paths.pip, "[install]\nno-cache-dir = true").unwrap();

        write_block(&ConfigBlock::pypi_repo(&paths, "https://pm/simple")).unwrap();
        assert_eq!(
            fs::read_to_string(&paths.pip).unwrap(),
            "[install]\nno-cache-dir = true\n[global]\nindex-url = https://pm/simple\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn client_secret_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, paths) = scratch();
        write_block(&ConfigBlock::oidc_client_secret(&paths, "wb", "s3cret")).unwrap();
        let mode = fs::metadata(&paths.openid_client_secret).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn write_failures_propagate() {
        let (dir, _paths) = scratch();
        // The parent "directory" is a regular file, so creating the target must fail.
        let blocker = dir.path().join("etc");
        fs::write(&blocker, "not a directory").unwrap();
        let block = ConfigBlock {
            kind: ConfigKind::Jupyter,
            target: blocker.join("rstudio/jupyter.conf"),
            lines: vec!["jupyter-exe=/opt/python/3.11.6/bin/jupyter".to_string()],
        };
        let err = write_block(&block).unwrap_err();
        assert!(matches!(err, WbiError::Io { .. }));
    }

    #[test]
    fn python_path_marker_matches_export_lines() {
        let file = ConfigFile::parse("export PATH=/opt/python/3.11.6/bin:$PATH\n");
        assert!(file.contains_key(ConfigKind::PythonPath.marker()));
    }
}
