// `wbi activate license --key K`

use crate::cli::cmd_enums::ActivateArgs;
use crate::cli::type_enums::ActivateItem;
use crate::commands::validation;
use crate::errors::WbiError;
use crate::libs::privileges::require_root;
use crate::libs::system::{Executor, shell_quote};
use crate::log_info;
use crate::logger::Logger;
use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivateRequest {
    License { key: String },
}

pub fn validate(args: &ActivateArgs) -> Result<ActivateRequest, WbiError> {
    match validation::parse_item::<ActivateItem>(&args.args)? {
        ActivateItem::License => {
            let key = validation::require(&args.key, "the key flag is required for license")?;
            Ok(ActivateRequest::License { key: key.to_string() })
        }
    }
}

pub fn activate_license(executor: &Executor, key: &str) -> anyhow::Result<()> {
    for command in license_commands(key) {
        executor.run(&command, true).context("activating the Workbench license")?;
    }
    log_info!("Workbench license activated");
    Ok(())
}

fn license_commands(key: &str) -> [String; 2] {
    [
        format!("rstudio-server license-manager activate {}", shell_quote(key)),
        "rstudio-server restart".to_string(),
    ]
}

pub fn run(request: ActivateRequest, logger: &Logger) -> anyhow::Result<()> {
    require_root()?;
    let executor = Executor::new(logger.transcript());
    match request {
        ActivateRequest::License { key } => activate_license(&executor, &key),
    }
}
