//! Reading raw YAML into the generic tree the schema contract inspects.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConversionError, Result};
use crate::types::Document;

/// Read the source document from disk.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "cannot read input");
        ConversionError::InputNotFound(path.to_path_buf())
    })
}

/// Parse YAML text into a generic tree.
///
/// Fails with [`ConversionError::Parse`] for malformed YAML,
/// [`ConversionError::EmptyDocument`] when the text holds no document (blank
/// or comments only) and [`ConversionError::NotAMapping`] when the top level
/// is a list or a scalar.
pub fn parse_document(source: &str) -> Result<Value> {
    if source.trim().is_empty() {
        return Err(ConversionError::EmptyDocument);
    }
    let value: Value =
        serde_yaml::from_str(source).map_err(|e| ConversionError::Parse(e.to_string()))?;
    match value {
        Value::Null => Err(ConversionError::EmptyDocument),
        Value::Object(_) => Ok(value),
        _ => Err(ConversionError::NotAMapping),
    }
}

/// Convert an accepted tree into typed records.
pub fn into_document(value: Value) -> Result<Document> {
    serde_json::from_value(value).map_err(|e| ConversionError::Parse(e.to_string()))
}
