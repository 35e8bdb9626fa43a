// Shared building blocks for each subcommand's `validate` step.
// Everything here is pure: no filesystem writes, no network, no root check.

use crate::errors::WbiError;
use std::str::FromStr;

/// Every item-taking subcommand accepts exactly one positional argument.
pub fn single_argument(args: &[String]) -> Result<&str, WbiError> {
    match args {
        [] => Err(WbiError::validation(
            "no arguments provided, please provide one argument",
        )),
        [one] => Ok(one.as_str()),
        _ => Err(WbiError::validation(
            "too many arguments provided, please provide only one argument",
        )),
    }
}

/// Parses the single positional into the subcommand's item enum.
pub fn parse_item<T>(args: &[String]) -> Result<T, WbiError>
where
    T: FromStr<Err = String>,
{
    single_argument(args)?
        .parse::<T>()
        .map_err(WbiError::Validation)
}

/// Fails with `message` when a flag that does not apply was given.
pub fn forbid<T>(flag: &Option<T>, message: &str) -> Result<(), WbiError> {
    match flag {
        Some(_) => Err(WbiError::validation(message)),
        None => Ok(()),
    }
}

/// Returns the flag's value, failing with `message` when it is missing or blank.
pub fn require<'a>(flag: &'a Option<String>, message: &str) -> Result<&'a str, WbiError> {
    match flag.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(WbiError::validation(message)),
    }
}
