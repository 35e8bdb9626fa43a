// This file implements the application's logging system.
// Console output goes through the `log_*!` macros below (colored level tags on stderr),
// and every message is also emitted as a `tracing` event so the JSON log file written
// by the `Logger` context captures the same history.
// The `Logger` additionally owns the command transcript: a shell script recording every
// privileged command `wbi` issued, for audit and replay.

use crate::cli::type_enums::LogLevel;
use anyhow::Context;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;

// `log_info!` for general application progress and informational messages.
// Like `log_warn!` and `log_debug!`, it stays off the terminal when `--loglevel` is stricter.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::info!("{}", message);
        if ::tracing::enabled!(::tracing::Level::INFO) {
            eprintln!("{} {}", ::colored::Colorize::bright_green("[INFO]"), message);
        }
    }};
}

// `log_warn!` for non-critical issues or noteworthy conditions.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::warn!("{}", message);
        if ::tracing::enabled!(::tracing::Level::WARN) {
            eprintln!("{} {}", ::colored::Colorize::bright_yellow("[WARN]"), message);
        }
    }};
}

// `log_error!` for critical errors requiring immediate attention.
// Always printed, even before a subscriber exists.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::error!("{}", message);
        eprintln!("{} {}", ::colored::Colorize::bright_red("[ERROR]"), message);
    }};
}

// `log_debug!` for detailed internal tracing.
// Only reaches the terminal when `--loglevel` is debug or trace.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::debug!("{}", message);
        if ::tracing::enabled!(::tracing::Level::DEBUG) {
            eprintln!("{} {}", ::colored::Colorize::dimmed("[DEBUG]"), message);
        }
    }};
}

impl LogLevel {
    /// Maps the CLI log level onto a `tracing` filter.
    /// `tracing` has no levels above ERROR, so `fatal` and `panic` collapse onto it.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => LevelFilter::ERROR,
        }
    }
}

/// Records every command handed to the system executor.
///
/// The file starts with a shebang so it can be replayed with `bash`. A disabled
/// transcript accepts records and drops them, which keeps tests off the filesystem.
#[derive(Debug)]
pub struct CommandTranscript {
    path: Option<PathBuf>,
    file: Option<File>,
}

impl CommandTranscript {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("creating command transcript {}", path.display()))?;
        writeln!(file, "#!/bin/bash")
            .with_context(|| format!("writing command transcript {}", path.display()))?;

        Ok(CommandTranscript {
            path: Some(path.to_path_buf()),
            file: Some(file),
        })
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        CommandTranscript {
            path: None,
            file: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends one command line to the transcript.
    pub fn record(&self, command: &str) -> std::io::Result<()> {
        if let Some(file) = &self.file {
            // `&File` implements `Write`, so recording does not need `&mut self`.
            let mut handle: &File = file;
            writeln!(handle, "{command}")?;
        }
        Ok(())
    }
}

/// The logging context for one `wbi` process.
///
/// Built once in `main` and handed by reference to every command. It owns the JSON log
/// file (through the installed `tracing` subscriber) and the command transcript.
pub struct Logger {
    log_path: PathBuf,
    transcript: CommandTranscript,
}

impl Logger {
    /// Creates `wbi-log-<timestamp>.log` and `wbi-command-<timestamp>.sh` in `dir`
    /// and installs the JSON subscriber at the requested level.
    pub fn init(level: LogLevel, dir: &Path) -> anyhow::Result<Self> {
        let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
        let log_path = dir.join(format!("wbi-log-{timestamp}.log"));
        let transcript_path = dir.join(format!("wbi-command-{timestamp}.sh"));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("creating log file {}", log_path.display()))?;

        // A subscriber may already be installed (tests); the first one wins.
        let _ = tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_max_level(level.level_filter())
            .with_writer(Mutex::new(log_file))
            .try_init();

        let transcript = CommandTranscript::create(&transcript_path)?;

        log_debug!(
            "Logger initialized at level {} (log: {}, commands: {})",
            level,
            log_path.display(),
            transcript_path.display()
        );

        Ok(Logger {
            log_path,
            transcript,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn transcript(&self) -> &CommandTranscript {
        &self.transcript
    }
}
