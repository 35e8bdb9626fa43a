// Thin wrappers over `dialoguer` used by `wbi setup`.
// Each returns a plain value or a `WbiError::Prompt`; all share one colorful theme.

use crate::errors::WbiError;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

pub fn confirm(prompt: &str, default: bool) -> Result<bool, WbiError> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Single choice; returns the index into `items`.
pub fn select(prompt: &str, items: &[String], default: usize) -> Result<usize, WbiError> {
    Ok(Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}

/// Multiple choice; returns the chosen indices into `items` in list order.
pub fn multiselect(prompt: &str, items: &[String], defaults: &[bool]) -> Result<Vec<usize>, WbiError> {
    Ok(MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .defaults(defaults)
        .interact()?)
}

/// Free text that must not be blank.
pub fn text(prompt: &str) -> Result<String, WbiError> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("a value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Free text that may be left empty, in which case `None` is returned.
pub fn optional_text(prompt: &str) -> Result<Option<String>, WbiError> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Hidden input for secrets and license keys.
pub fn password(prompt: &str) -> Result<String, WbiError> {
    Ok(Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()?)
}
