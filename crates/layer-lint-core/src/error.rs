//! Run-aborting error taxonomy.
//!
//! Only problems with the rule file or the ingested import data are errors.
//! A detected architecture breach is a [`crate::Violation`], returned as
//! data in the [`crate::Report`], never through these types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors in the rule configuration or the unit-to-component mapping.
///
/// Fatal for the whole run: a report built against unknown components
/// would be misleading, so no partial report is produced.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ConfigError {
    /// Component name is empty.
    #[error("component name must not be empty")]
    EmptyComponentName,

    /// Component name contains invalid characters.
    #[error("invalid component name `{name}`: must be [a-z0-9-]")]
    #[diagnostic(help("component names are lowercase identifiers like `domain` or `infra-db`"))]
    InvalidComponentName {
        /// The invalid name.
        name: String,
    },

    /// The same component was declared twice.
    #[error("duplicate component `{name}`")]
    DuplicateComponent {
        /// The duplicated name.
        name: String,
    },

    /// A rule or mapping references a component that was never declared.
    #[error("{context}: unknown component `{name}`")]
    #[diagnostic(help("declare the component before referencing it in a rule"))]
    UnknownComponent {
        /// Where the reference was found (e.g. the offending rule).
        context: String,
        /// The undeclared component name.
        name: String,
    },

    /// Strict mode found a unit that no component claims.
    #[error("unit `{unit}` is not mapped to any component")]
    #[diagnostic(help(
        "add the unit to a component's path patterns, or set unmapped-units = \"unclassified\""
    ))]
    UnmappedUnit {
        /// The unmapped compilation unit.
        unit: String,
    },
}

/// Malformed raw edge data from the ingestion boundary.
///
/// Rejected at graph construction; the run aborts.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum IngestionError {
    /// An import record has an empty unit identifier.
    #[error("import record {index}: empty unit identifier")]
    EmptyUnitName {
        /// Zero-based index of the offending record.
        index: usize,
    },

    /// An import record lacks a usable source location.
    #[error("import `{from_unit}` -> `{to_unit}`: missing source location")]
    MissingLocation {
        /// The importing unit.
        from_unit: String,
        /// The imported unit.
        to_unit: String,
    },
}

/// Either of the run-aborting error kinds.
#[derive(Debug, Error, Diagnostic)]
pub enum ValidateError {
    /// The rule file or mapping is wrong.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The ingested import data is wrong.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingestion(#[from] IngestionError),
}
