// Clap definitions and argument enums.
mod cli;
// One module per subcommand.
mod commands;
// The `WbiError` taxonomy.
mod errors;
// R, Python, Quarto, Workbench and add-on installers.
mod installers;
// Shared building blocks: executor, HTTP, config writer, scanner, versions.
mod libs;
// Console macros, JSON log file and command transcript.
mod logger;

use clap::Parser;
use cli::cmd_enums::Cli;
use logger::Logger;
use std::path::Path;
use std::process::exit;

fn main() {
    let cli = Cli::parse();

    // Creates the log and transcript files; the only write that precedes validation.
    let logger = match Logger::init(cli.loglevel, Path::new(".")) {
        Ok(logger) => logger,
        Err(e) => {
            log_error!("{:#}", e);
            exit(1);
        }
    };

    if let Err(e) = commands::dispatch(cli.command, &logger) {
        log_error!("{:#}", e);
        log_error!("Full log written to {}", logger.log_path().display());
        exit(1);
    }
}
