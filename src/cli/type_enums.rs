use std::fmt;
use std::str::FromStr;

/// Verbosity accepted by the global `--loglevel` flag.
/// `fatal` and `panic` are accepted for compatibility and behave like `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "panic" => Ok(LogLevel::Panic),
            _ => {
                let valid = ["trace", "debug", "info", "warn", "error", "fatal", "panic"].join(", ");
                Err(format!("invalid log level '{s}', valid options are: {valid}"))
            }
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Fatal => write!(f, "fatal"),
            LogLevel::Panic => write!(f, "panic"),
        }
    }
}

/// Languages and tools whose versions `wbi` can scan for, validate, and install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    R,
    Python,
    Quarto,
}

impl Language {
    /// Human-facing name used in messages ("version X is not a valid R version").
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::R => "R",
            Language::Python => "Python",
            Language::Quarto => "Quarto",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r" => Ok(Language::R),
            "python" => Ok(Language::Python),
            "quarto" => Ok(Language::Quarto),
            _ => Err(format!(
                "invalid argument '{s}', valid options are: r, python, quarto"
            )),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Language::R => write!(f, "r"),
            Language::Python => write!(f, "python"),
            Language::Quarto => write!(f, "quarto"),
        }
    }
}

/// Everything `wbi install` knows how to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallTarget {
    R,
    Python,
    Quarto,
    Workbench,
    ProDrivers,
    Jupyter,
}

impl InstallTarget {
    /// The versioned language behind this target, if the target takes `--version`.
    pub fn language(&self) -> Option<Language> {
        match self {
            InstallTarget::R => Some(Language::R),
            InstallTarget::Python => Some(Language::Python),
            InstallTarget::Quarto => Some(Language::Quarto),
            InstallTarget::Workbench | InstallTarget::ProDrivers | InstallTarget::Jupyter => None,
        }
    }
}

impl FromStr for InstallTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r" => Ok(InstallTarget::R),
            "python" => Ok(InstallTarget::Python),
            "quarto" => Ok(InstallTarget::Quarto),
            "workbench" => Ok(InstallTarget::Workbench),
            "prodrivers" => Ok(InstallTarget::ProDrivers),
            "jupyter" => Ok(InstallTarget::Jupyter),
            _ => {
                let valid = ["r", "python", "quarto", "workbench", "prodrivers", "jupyter"].join(", ");
                Err(format!("invalid argument '{s}', valid options are: {valid}"))
            }
        }
    }
}

impl fmt::Display for InstallTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstallTarget::R => write!(f, "r"),
            InstallTarget::Python => write!(f, "python"),
            InstallTarget::Quarto => write!(f, "quarto"),
            InstallTarget::Workbench => write!(f, "workbench"),
            InstallTarget::ProDrivers => write!(f, "prodrivers"),
            InstallTarget::Jupyter => write!(f, "jupyter"),
        }
    }
}

/// Settings `wbi config` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigItem {
    Ssl,
    Repo,
    ConnectUrl,
}

impl FromStr for ConfigItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ssl" => Ok(ConfigItem::Ssl),
            "repo" => Ok(ConfigItem::Repo),
            "connect-url" => Ok(ConfigItem::ConnectUrl),
            _ => Err(format!(
                "invalid argument '{s}', valid options are: ssl, repo, connect-url"
            )),
        }
    }
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigItem::Ssl => write!(f, "ssl"),
            ConfigItem::Repo => write!(f, "repo"),
            ConfigItem::ConnectUrl => write!(f, "connect-url"),
        }
    }
}

/// Package repository flavours a Package Manager URL can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSource {
    Cran,
    Pypi,
}

impl FromStr for RepoSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cran" => Ok(RepoSource::Cran),
            "pypi" => Ok(RepoSource::Pypi),
            _ => Err("the source flag only allows cran and pypi".to_string()),
        }
    }
}

impl fmt::Display for RepoSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RepoSource::Cran => write!(f, "cran"),
            RepoSource::Pypi => write!(f, "pypi"),
        }
    }
}

/// Things `wbi verify` can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyItem {
    PackageManager,
    ConnectUrl,
    Workbench,
    Ssl,
    License,
}

impl FromStr for VerifyItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "packagemanager" => Ok(VerifyItem::PackageManager),
            "connect-url" => Ok(VerifyItem::ConnectUrl),
            "workbench" => Ok(VerifyItem::Workbench),
            "ssl" => Ok(VerifyItem::Ssl),
            "license" => Ok(VerifyItem::License),
            _ => {
                let valid = ["packagemanager", "connect-url", "workbench", "ssl", "license"].join(", ");
                Err(format!("invalid argument '{s}', valid options are: {valid}"))
            }
        }
    }
}

impl fmt::Display for VerifyItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VerifyItem::PackageManager => write!(f, "packagemanager"),
            VerifyItem::ConnectUrl => write!(f, "connect-url"),
            VerifyItem::Workbench => write!(f, "workbench"),
            VerifyItem::Ssl => write!(f, "ssl"),
            VerifyItem::License => write!(f, "license"),
        }
    }
}

/// Repository languages a Package Manager repo can serve, as accepted by `verify --language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoLanguage {
    R,
    Python,
}

impl RepoLanguage {
    /// The repository `type` Package Manager reports for this language.
    pub fn repo_type(&self) -> &'static str {
        match self {
            RepoLanguage::R => "R",
            RepoLanguage::Python => "Python",
        }
    }
}

impl FromStr for RepoLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r" => Ok(RepoLanguage::R),
            "python" => Ok(RepoLanguage::Python),
            _ => Err("the language flag only allows r and python".to_string()),
        }
    }
}

/// Items `wbi activate` can activate. Only the Workbench license today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateItem {
    License,
}

impl FromStr for ActivateItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "license" => Ok(ActivateItem::License),
            _ => Err(format!("invalid argument '{s}', valid options are: license")),
        }
    }
}
