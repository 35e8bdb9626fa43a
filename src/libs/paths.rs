// Well-known locations on the Workbench host.
// Config file locations are grouped in `ConfigPaths` so commands can be pointed at a
// scratch directory in tests while production code always uses `ConfigPaths::default()`.

use std::path::PathBuf;

pub const RSERVER_CONF: &str = "/etc/rstudio/rserver.conf";
pub const REPOS_CONF: &str = "/etc/rstudio/repos.conf";
pub const PIP_CONF: &str = "/etc/pip.conf";
pub const RSESSION_CONF: &str = "/etc/rstudio/rsession.conf";
pub const JUPYTER_CONF: &str = "/etc/rstudio/jupyter.conf";
pub const OPENID_CLIENT_SECRET: &str = "/etc/rstudio/openid-client-secret";
pub const PYTHON_PROFILE_SCRIPT: &str = "/etc/profile.d/wbi_python.sh";

/// The `rserver` binary; its presence means Workbench is already installed.
pub const WORKBENCH_SERVER_BINARY: &str = "/usr/lib/rstudio-server/bin/rserver";

pub const ODBCINST_INI: &str = "/etc/odbcinst.ini";
pub const PRO_DRIVERS_SAMPLE_INI: &str = "/opt/rstudio-drivers/odbcinst.ini.sample";

pub const QUARTO_ROOT: &str = "/opt/quarto";
pub const SYMLINK_DIR: &str = "/usr/local/bin";

/// Target files for every config kind `wbi` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub rserver: PathBuf,
    pub repos: PathBuf,
    pub pip: PathBuf,
    pub rsession: PathBuf,
    pub jupyter: PathBuf,
    pub openid_client_secret: PathBuf,
    pub python_profile: PathBuf,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        ConfigPaths {
            rserver: PathBuf::from(RSERVER_CONF),
            repos: PathBuf::from(REPOS_CONF),
            pip: PathBuf::from(PIP_CONF),
            rsession: PathBuf::from(RSESSION_CONF),
            jupyter: PathBuf::from(JUPYTER_CONF),
            openid_client_secret: PathBuf::from(OPENID_CLIENT_SECRET),
            python_profile: PathBuf::from(PYTHON_PROFILE_SCRIPT),
        }
    }
}

impl ConfigPaths {
    /// Same file names as production, rooted under `root` (e.g. a temp directory).
    #[cfg(test)]
    pub fn rooted_at(root: &std::path::Path) -> Self {
        let defaults = ConfigPaths::default();
        let reroot = |path: &std::path::Path| root.join(path.strip_prefix("/").unwrap_or(path));
        ConfigPaths {
            rserver: reroot(&defaults.rserver),
            repos: reroot(&defaults.repos),
            pip: reroot(&defaults.pip),
            rsession: reroot(&defaults.rsession),
            jupyter: reroot(&defaults.jupyter),
            openid_client_secret: reroot(&defaults.openid_client_secret),
            python_profile: reroot(&defaults.python_profile),
        }
    }
}
