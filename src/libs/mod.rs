// Building blocks shared by the installers and commands.

// Appending settings to Workbench config files, at most once per marker.
pub mod config_writer;
// Timeout-bounded HTTP downloads and endpoint checks.
pub mod http;
// Host distribution detection.
pub mod os;
// Fixed host paths.
pub mod paths;
pub mod privileges;
pub mod prompts;
// Discovery of existing language installations.
pub mod scanner;
// The system executor.
pub mod system;
pub mod utilities;
// Endpoint, certificate and license checks.
pub mod verification;
// Installable version catalogs and sorting.
pub mod versions;
