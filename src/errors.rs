// Error taxonomy for `wbi`.
// Leaf errors are typed here with `thiserror`; callers add step context with `anyhow`
// as the error travels up to `main`, which logs the whole chain and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure `wbi` can report on its own behalf.
///
/// Transport errors deliberately carry a fixed message plus the URL instead of the
/// underlying `ureq` detail; the detail is written to the debug log at the failure site.
#[derive(Debug, Error)]
pub enum WbiError {
    /// Bad argument or flag combination, caught before anything is touched.
    #[error("{0}")]
    Validation(String),

    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("this command must be run as root")]
    NotRoot,

    #[error("the file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("error making request to {url}")]
    Http { url: String },

    #[error("received unexpected status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("error decoding the response from {url}")]
    Decode { url: String },

    #[error("command `{command}` failed with exit code {code}: {output}")]
    Command {
        command: String,
        code: i32,
        output: String,
    },

    /// Idempotence refusal: the marker key is already present in the target file.
    #[error("{marker} configuration already exists in {}", .file.display())]
    AlreadyExists { marker: String, file: PathBuf },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl WbiError {
    /// Shorthand for building a [`WbiError::Validation`] from anything string-like.
    pub fn validation(message: impl Into<String>) -> Self {
        WbiError::Validation(message.into())
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WbiError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
