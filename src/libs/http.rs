// Blocking HTTP helpers built on `ureq`.
// Downloads get a 30 second budget, verification checks 5 seconds. Failures map to
// fixed messages (`WbiError::Http`, `HttpStatus`, `Decode`); the transport detail only
// goes to the debug log.

use crate::errors::WbiError;
use crate::{log_debug, log_info};
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("wbi/", env!("CARGO_PKG_VERSION"));

fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// GETs `url` and insists on a 200.
fn get(url: &str, timeout: Duration) -> Result<ureq::Response, WbiError> {
    match agent(timeout).get(url).call() {
        Ok(response) if response.status() == 200 => Ok(response),
        Ok(response) => Err(WbiError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        }),
        Err(ureq::Error::Status(status, _)) => Err(WbiError::HttpStatus {
            url: url.to_string(),
            status,
        }),
        Err(e) => {
            log_debug!("[HTTP] Request to {} failed: {}", url, e);
            Err(WbiError::Http {
                url: url.to_string(),
            })
        }
    }
}

/// Succeeds when `url` answers 200 within the verification timeout.
pub fn check_status(url: &str) -> Result<(), WbiError> {
    get(url, VERIFY_TIMEOUT).map(|_| ())
}

/// GETs `url` with the given timeout and decodes the JSON body.
pub fn get_json<T: DeserializeOwned>(url: &str, timeout: Duration) -> Result<T, WbiError> {
    let response = get(url, timeout)?;
    response.into_json::<T>().map_err(|e| {
        log_debug!("[HTTP] Decoding response from {} failed: {}", url, e);
        WbiError::Decode {
            url: url.to_string(),
        }
    })
}

/// Downloads `url` into a new, uniquely named temporary file and returns its path.
///
/// The file keeps `file_name` as its suffix so package tools that look at extensions
/// (gdebi) accept it. It is not removed afterwards.
pub fn download_to_temp(url: &str, file_name: &str) -> Result<PathBuf, WbiError> {
    log_info!("Downloading {}", url.blue());
    let response = get(url, DOWNLOAD_TIMEOUT)?;

    let temp = tempfile::Builder::new()
        .prefix("wbi-")
        .suffix(&format!("-{file_name}"))
        .tempfile()
        .map_err(|e| WbiError::io("creating temporary file for", file_name, e))?;
    let path = temp
        .into_temp_path()
        .keep()
        .map_err(|e| WbiError::io("keeping temporary file for", file_name, e.error))?;

    let mut file = File::create(&path).map_err(|e| WbiError::io("opening", &path, e))?;
    let mut reader = response.into_reader();
    io::copy(&mut reader, &mut file).map_err(|e| WbiError::io("downloading to", &path, e))?;

    log_debug!("[HTTP] Saved {} to {}", url, path.display().to_string().green());
    Ok(path)
}
