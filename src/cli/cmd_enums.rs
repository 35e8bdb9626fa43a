use crate::cli::type_enums::LogLevel;
use clap::{Args, Parser, Subcommand};

/// Defines the command-line interface for `wbi`.
///
/// Positional arguments are collected as raw strings on purpose: each subcommand's
/// `validate` step owns the "exactly one argument" rule and the per-item flag matrix,
/// so the error messages stay fixed no matter how clap would have phrased them.
#[derive(Parser)]
#[command(name = "wbi")]
#[command(about = "Install and configure Posit Workbench, its languages and integrations", long_about = None)]
pub struct Cli {
    /// Log level for the console and the JSON log file [trace, debug, info, warn, error, fatal, panic].
    #[arg(long, global = true, default_value = "info")]
    pub(crate) loglevel: LogLevel,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactively install and configure Workbench and everything around it.
    Setup(SetupArgs),
    /// Install R, Python, Quarto, Workbench, Pro Drivers, or Jupyter.
    Install(InstallArgs),
    /// Scan the system for existing R, Python, or Quarto installations.
    Scan(ScanArgs),
    /// Write SSL, package repository, or Connect URL configuration.
    Config(ConfigArgs),
    /// Verify Package Manager, Connect, Workbench, SSL, or the license.
    Verify(VerifyArgs),
    /// Activate the Workbench license.
    Activate(ActivateArgs),
}

#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    #[arg(hide = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// What to install [r, python, quarto, workbench, prodrivers, jupyter].
    pub args: Vec<String>,
    /// Comma-separated versions to install (r, python, quarto only).
    #[arg(long, value_delimiter = ',')]
    pub version: Option<Vec<String>>,
    /// Python interpreter to install Jupyter into (jupyter only).
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// What to scan for [r, python, quarto].
    pub args: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// What to configure [ssl, repo, connect-url].
    pub args: Vec<String>,
    /// Path to the SSL certificate (ssl only).
    #[arg(long)]
    pub cert_path: Option<String>,
    /// Path to the SSL certificate key (ssl only).
    #[arg(long)]
    pub key_path: Option<String>,
    /// URL of the Package Manager repository, Connect server, or Workbench (ssl).
    #[arg(long)]
    pub url: Option<String>,
    /// Repository type for repo [cran, pypi].
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// What to verify [packagemanager, connect-url, workbench, ssl, license].
    pub args: Vec<String>,
    /// Base URL of Package Manager or Connect.
    #[arg(long)]
    pub url: Option<String>,
    /// Package Manager repository name (packagemanager only).
    #[arg(long)]
    pub repo: Option<String>,
    /// Repository language [r, python] (packagemanager only).
    #[arg(long)]
    pub language: Option<String>,
    /// Path to the SSL certificate (ssl only).
    #[arg(long)]
    pub cert_path: Option<String>,
    /// Path to the SSL certificate key (ssl only).
    #[arg(long)]
    pub key_path: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ActivateArgs {
    /// What to activate [license].
    pub args: Vec<String>,
    /// License key (license only).
    #[arg(long)]
    pub key: Option<String>,
}
