//! One-call conversion: parse → validate → build → serialize.
//!
//! Nothing is returned unless every stage succeeds, so callers can write the
//! result to its destination without ever leaving partial output behind.

use tracing::debug;

use crate::builder::build_graph;
use crate::config::ConversionOptions;
use crate::document::{into_document, parse_document};
use crate::error::{ConversionError, Result};
use crate::render::render_graph;
use crate::types::Document;
use crate::validation::{MetamodelSchema, SchemaValidator, Violation};

/// Convert YAML `source` using the built-in [`MetamodelSchema`].
pub fn convert(source: &str, options: &ConversionOptions) -> Result<String> {
    convert_with(source, options, &MetamodelSchema::new())
}

/// Convert YAML `source`, checking it against `validator` first.
pub fn convert_with(
    source: &str,
    options: &ConversionOptions,
    validator: &dyn SchemaValidator,
) -> Result<String> {
    let document = load_with(source, validator)?;
    debug!(
        entities = document.entity_kinds.len(),
        relations = document.relation_kinds.len(),
        "document accepted"
    );
    let graph = build_graph(&document, options)?;
    debug!(triples = graph.len(), "graph built");
    let out = render_graph(&graph, options.format)?;
    debug!(format = %options.format, bytes = out.len(), "graph serialized");
    Ok(out)
}

/// Parse and validate `source` into typed records without building a graph.
pub fn load_with(source: &str, validator: &dyn SchemaValidator) -> Result<Document> {
    let value = parse_document(source)?;
    let violations = validator.validate(&value);
    if !violations.is_empty() {
        debug!(count = violations.len(), "document rejected by schema");
        return Err(ConversionError::SchemaValidation(violations));
    }
    into_document(value)
}

/// Check `source` against `validator` and return every violation found.
///
/// Parse-level failures (malformed, empty, not a mapping) are still errors;
/// an `Ok` with an empty list means the document is accepted.
pub fn validate_source(source: &str, validator: &dyn SchemaValidator) -> Result<Vec<Violation>> {
    let value = parse_document(source)?;
    Ok(validator.validate(&value))
}
