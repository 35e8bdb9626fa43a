// Register application subcommands.
// Each module is one `wbi` subcommand: a pure `validate` step turning raw clap
// arguments into a request, then a `run` step that acts on it.

use crate::cli::cmd_enums::Commands;
use crate::libs::versions::StaticCatalog;
use crate::logger::Logger;

// Activating the Workbench license.
pub mod activate;
// Writing SSL, repository and Connect settings.
pub mod config;
// Installing languages, Workbench and add-ons.
pub mod install;
// Listing existing installations.
pub mod scan;
// The interactive, end-to-end flow.
pub mod setup;
// Argument-count and flag helpers shared by every `validate`.
pub mod validation;
// Read-only integration checks.
pub mod verify;

/// Validates the parsed subcommand and runs it.
///
/// Validation always completes before any root check, OS detection, or side effect.
pub fn dispatch(command: Commands, logger: &Logger) -> anyhow::Result<()> {
    match command {
        Commands::Setup(args) => {
            setup::validate(&args)?;
            setup::run(logger)
        }
        Commands::Install(args) => {
            let request = install::validate(&args, &StaticCatalog)?;
            install::run(request, logger)
        }
        Commands::Scan(args) => {
            let language = scan::validate(&args)?;
            scan::run(language)
        }
        Commands::Config(args) => {
            let request = config::validate(&args)?;
            config::run(request)
        }
        Commands::Verify(args) => {
            let request = verify::validate(&args)?;
            verify::run(request, logger)
        }
        Commands::Activate(args) => {
            let request = activate::validate(&args)?;
            activate::run(request, logger)
        }
    }
}
