//! Converts metamodel documents into OWL/SKOS ontologies.
//!
//! A metamodel document is a YAML description of a domain: entity kinds with
//! their attributes, relation kinds between entities, controlled-vocabulary
//! dictionaries and free-form metadata. This crate validates such a document,
//! builds the equivalent semantic graph and writes it as Turtle, RDF/XML or
//! JSON-LD. It is the library behind the `mm2owl` CLI.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`document`] | Reading YAML into the generic tree the schema inspects |
//! | [`validation`] | The pluggable schema contract: [`SchemaValidator`], [`MetamodelSchema`] |
//! | [`types`] | Typed document records: [`Document`], [`EntityKind`], [`RelationKind`] |
//! | [`namespace`] | Vocabulary constants and identifier minting via [`Resolver`] |
//! | [`term`] | `oxrdf` terms and their constructors: [`Term`], [`Triple`] |
//! | [`graph`] | The in-memory semantic graph: [`Graph`] |
//! | [`builder`] | Document → graph |
//! | [`cardinality`] | OWL cardinality restrictions |
//! | [`taxonomy`] | The optional SKOS annotation layer |
//! | [`render`] | Deterministic Turtle, RDF/XML and JSON-LD output |
//! | [`pipeline`] | Validate → build → serialize in one call |
//! | [`projection`] | Simplified entity/relation shape for diagram generators |
//! | [`config`] | [`ConversionOptions`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use metamodel2owl::{convert, ConversionOptions, Format};
//!
//! let yaml = std::fs::read_to_string("metamodel.yaml")?;
//! let options = ConversionOptions::new("http://example.com/bank/")?
//!     .with_cardinalities(true)
//!     .with_format(Format::Turtle);
//! let turtle = convert(&yaml, &options)?;
//! ```

pub mod builder;
pub mod cardinality;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod namespace;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod taxonomy;
pub mod term;
pub mod types;
pub mod validation;

pub use builder::build_graph;
pub use config::{parse_prefix, parse_prefixes, ConversionOptions, DEFAULT_BASE_IRI};
pub use error::{ConversionError, Result};
pub use graph::Graph;
pub use namespace::Resolver;
pub use pipeline::{convert, convert_with, load_with, validate_source};
pub use projection::{group_entities, DiagramEntity, DiagramRelation, Metamodel, View};
pub use render::{render_graph, Format};
pub use term::{Term, Triple};
pub use types::{AttributeType, Document, EntityKind, RelationKind};
pub use validation::{MetamodelSchema, SchemaValidator, Violation};
