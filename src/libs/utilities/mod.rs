// Small helpers shared across the installers and commands.

// Tilde expansion and validation of operator-supplied paths.
pub mod path_helpers;
// Tarball extraction for installers that do not ship as distro packages.
pub mod compression;
