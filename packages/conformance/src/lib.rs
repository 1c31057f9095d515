//! Shared helpers for the metamodel2owl conformance test suite.
//!
//! Fixtures live in `packages/conformance/fixtures/`. [`load_fixture`] reads
//! one by file name and [`build_fixture`] runs it through the same validate →
//! build path the pipeline uses, returning the graph so tests can assert on
//! individual statements rather than on serialized text.

use std::fs;
use std::path::PathBuf;

use metamodel2owl::{build_graph, load_with, ConversionOptions, Graph, MetamodelSchema, Resolver, Result};

/// Base namespace shared by every conformance test.
pub const BASE_IRI: &str = "http://example.com/bank/";

/// Absolute path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Read a fixture file.
///
/// # Panics
///
/// Panics if the fixture does not exist.
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e))
}

/// Options for the end-to-end scenario: cardinality and taxonomy enabled.
pub fn scenario_options() -> ConversionOptions {
    ConversionOptions::new(BASE_IRI)
        .expect("valid base IRI")
        .with_cardinalities(true)
        .with_skos_tags(true)
}

/// Validate and build a fixture with the built-in schema.
pub fn build_fixture(name: &str, options: &ConversionOptions) -> Result<Graph> {
    let document = load_with(&load_fixture(name), &MetamodelSchema::new())?;
    build_graph(&document, options)
}

/// Resolver over [`BASE_IRI`], for computing expected identifiers.
pub fn resolver() -> Resolver {
    Resolver::new(BASE_IRI).expect("valid base IRI")
}
