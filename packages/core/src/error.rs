//! The single error type returned by every stage of the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::Violation;

/// Errors returned when a metamodel document cannot be converted.
///
/// Every variant is terminal for a run: the pipeline never produces partial
/// output once one of these has been raised. Dangling relation endpoints,
/// absent optional fields and unknown attribute types are deliberately *not*
/// represented here because they degrade to omitted triples or defaults.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to parse YAML: {0}")]
    Parse(String),

    #[error("empty YAML document provided")]
    EmptyDocument,

    #[error("top level YAML structure must be a mapping/object")]
    NotAMapping,

    #[error("schema validation failed:\n{}", format_violations(.0))]
    SchemaValidation(Vec<Violation>),

    #[error("{path} is missing required 'id'")]
    MissingRequiredField { path: String },

    #[error("duplicate entity id {0:?}")]
    DuplicateEntityId(String),

    #[error("attribute identifier {0:?} is minted by more than one attribute")]
    DuplicateAttributeId(String),

    #[error("unsupported format {0:?}; expected one of: turtle, rdfxml, jsonld")]
    UnsupportedFormat(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("cannot serialize graph: {0}")]
    Serialization(String),

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

/// Render violations the way they are reported to users:
///
/// ```text
/// - $/meta: 'bank_code' is a required property
/// - $/meta/owner: {"a":1} is not valid under any of the given schemas
///     * $/meta/owner: {"a":1} is not of type 'string'
/// ```
pub fn format_violations(violations: &[Violation]) -> String {
    let mut lines = Vec::new();
    for v in violations {
        lines.push(format!("- {}: {}", v.path, v.message));
        for sub in &v.context {
            lines.push(format!("    * {}: {}", sub.path, sub.message));
        }
    }
    lines.join("\n")
}
