// Version catalog and validation.
// The catalog answers "which versions can `wbi` install for this language"; the
// validator holds requested versions against it byte for byte, and `sort_versions`
// orders version strings newest-first for picking sensible defaults.

use crate::cli::type_enums::Language;
use crate::errors::WbiError;
use semver::Version;

/// Source of installable versions per language.
///
/// Validation only ever talks to this trait, so a catalog fetched from the CDN can
/// replace the static lists without touching callers.
pub trait VersionCatalog {
    fn valid_versions(&self, language: Language) -> Vec<String>;
}

/// Hard-coded lists of versions published on the Posit CDN / Quarto releases.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

const R_VERSIONS: &[&str] = &[
    "4.3.2", "4.3.1", "4.3.0", "4.2.3", "4.2.2", "4.2.1", "4.2.0", "4.1.3", "4.1.2", "4.1.1",
    "4.1.0", "4.0.5", "4.0.4", "4.0.3", "4.0.2", "4.0.1", "4.0.0", "3.6.3", "3.6.2", "3.6.1",
    "3.6.0", "3.5.3", "3.5.2", "3.5.1", "3.5.0", "3.4.4", "3.4.3", "3.4.2", "3.4.1", "3.4.0",
    "3.3.3", "3.3.2", "3.3.1", "3.3.0",
];

const PYTHON_VERSIONS: &[&str] = &[
    "3.12.0", "3.11.6", "3.11.5", "3.11.4", "3.11.3", "3.11.2", "3.11.1", "3.11.0", "3.10.13",
    "3.10.12", "3.10.11", "3.10.10", "3.10.9", "3.10.8", "3.10.7", "3.10.6", "3.10.5",
    "3.10.4", "3.9.18", "3.9.17", "3.9.16", "3.9.15", "3.9.14", "3.9.13", "3.9.12", "3.8.18",
    "3.8.17", "3.8.16", "3.8.15", "3.7.17", "3.7.16", "3.7.15",
];

const QUARTO_VERSIONS: &[&str] = &[
    "1.4.549", "1.3.450", "1.3.361", "1.3.340", "1.2.475", "1.2.335", "1.1.189",
];

impl VersionCatalog for StaticCatalog {
    fn valid_versions(&self, language: Language) -> Vec<String> {
        let versions = match language {
            Language::R => R_VERSIONS,
            Language::Python => PYTHON_VERSIONS,
            Language::Quarto => QUARTO_VERSIONS,
        };
        versions.iter().map(|v| v.to_string()).collect()
    }
}

/// Checks every requested version against the catalog.
///
/// Matching is exact string equality. The first version not in the catalog is the one
/// reported, even when later ones are invalid too.
pub fn validate_versions(
    catalog: &dyn VersionCatalog,
    language: Language,
    requested: &[String],
) -> Result<(), WbiError> {
    let valid = catalog.valid_versions(language);
    for version in requested {
        if !valid.iter().any(|v| v == version) {
            return Err(WbiError::validation(format!(
                "version {} is not a valid {} version",
                version,
                language.display_name()
            )));
        }
    }
    Ok(())
}

/// Sorts version strings newest first.
///
/// Strings that are not valid semantic versions are never rejected: they keep their
/// original text and relative order, and sort after every valid version.
pub fn sort_versions(raw: &[String]) -> Vec<String> {
    let mut parsed: Vec<Version> = Vec::new();
    let mut malformed: Vec<String> = Vec::new();

    for version in raw {
        match Version::parse(version) {
            Ok(v) => parsed.push(v),
            Err(_) => malformed.push(version.clone()),
        }
    }

    parsed.sort_by(|a, b| b.cmp(a));
    parsed
        .into_iter()
        .map(|v| v.to_string())
        .chain(malformed)
        .collect()
}

/// Newest catalog version for a language; the default offered to the operator.
pub fn latest_version(catalog: &dyn VersionCatalog, language: Language) -> Option<String> {
    sort_versions(&catalog.valid_versions(language)).into_iter().next()
}
