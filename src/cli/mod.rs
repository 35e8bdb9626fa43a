// Command-line surface: clap definitions and the closed enums their arguments parse into.
pub mod cmd_enums;
pub mod type_enums;
