// `wbi scan <language>`: list existing installations without touching anything.

use crate::cli::cmd_enums::ScanArgs;
use crate::cli::type_enums::Language;
use crate::commands::validation;
use crate::errors::WbiError;
use crate::libs::scanner::scan_for_versions;
use crate::{log_info, log_warn};
use anyhow::Context;
use colored::Colorize;

pub fn validate(args: &ScanArgs) -> Result<Language, WbiError> {
    validation::parse_item(&args.args)
}

pub fn run(language: Language) -> anyhow::Result<()> {
    let found = scan_for_versions(language)
        .with_context(|| format!("scanning for {} installations", language.display_name()))?;

    if found.is_empty() {
        log_warn!("No {} installations found", language.display_name());
        return Ok(());
    }

    log_info!(
        "Found {} installation(s) of {}",
        found.len(),
        language.display_name().bold()
    );
    println!("{}", found.join(", "));
    Ok(())
}
