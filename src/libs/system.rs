// The system executor: the single place `wbi` spawns shell commands.
// Every command goes through `bash -c`, is recorded in the command transcript first,
// and fails hard on a non-zero exit. Nothing is retried.

use crate::errors::WbiError;
use crate::logger::CommandTranscript;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::process::Command;

/// Single-quotes `value` for interpolation into a `bash -c` command line.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Runs shell commands on behalf of the installers and verifiers.
pub struct Executor<'a> {
    transcript: &'a CommandTranscript,
}

impl<'a> Executor<'a> {
    pub fn new(transcript: &'a CommandTranscript) -> Self {
        Executor { transcript }
    }

    /// Runs `command` and returns its combined stdout and stderr.
    ///
    /// When `display` is set the command line is echoed before it runs and its output
    /// is printed afterwards; otherwise both only reach the debug log.
    pub fn run(&self, command: &str, display: bool) -> Result<String, WbiError> {
        self.transcript
            .record(command)
            .map_err(|e| WbiError::io("recording command in", self.transcript_label(), e))?;

        if display {
            log_info!("Running: {}", command.cyan());
        } else {
            log_debug!("[Executor] Running: {}", command);
        }

        let output = Command::new("bash")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| WbiError::io("spawning bash for", command, e))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(WbiError::Command {
                command: command.to_string(),
                code: output.status.code().unwrap_or(-1),
                output: combined.trim().to_string(),
            });
        }

        if display && !combined.trim().is_empty() {
            println!("{}", combined.trim_end());
        } else {
            log_debug!("[Executor] Output: {}", combined.trim_end());
        }
        Ok(combined)
    }

    fn transcript_label(&self) -> String {
        self.transcript
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "command transcript".to_string())
    }
}
