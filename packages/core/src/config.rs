//! Conversion options consumed by the builder and serializer.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use oxrdf::NamedNode;
use regex::Regex;

use crate::error::{ConversionError, Result};
use crate::namespace::Resolver;
use crate::render::Format;

/// Base namespace used when none is configured.
pub const DEFAULT_BASE_IRI: &str = "http://example.com/metamodel/";

/// Everything a conversion run needs besides the document itself.
///
/// | Option | Default | Effect |
/// |--------|---------|--------|
/// | `base_iri` | [`DEFAULT_BASE_IRI`] | Namespace all resources are minted under |
/// | `ontology_iri` | `<base_iri>ontology` | Identifier of the ontology resource |
/// | `prefixes` | none | Extra `prefix → namespace` bindings for output |
/// | `use_cardinalities` | `false` | Emit OWL cardinality restrictions |
/// | `skos_tags` | `false` | Emit SKOS labels, definitions and scope notes |
/// | `format` | [`Format::Turtle`] | Output encoding |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    base_iri: String,
    ontology_iri: Option<String>,
    pub prefixes: BTreeMap<String, String>,
    pub use_cardinalities: bool,
    pub skos_tags: bool,
    pub format: Format,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            base_iri: DEFAULT_BASE_IRI.to_string(),
            ontology_iri: None,
            prefixes: BTreeMap::new(),
            use_cardinalities: false,
            skos_tags: false,
            format: Format::default(),
        }
    }
}

impl ConversionOptions {
    /// Options for `base_iri`, normalized to end with `/` or `#`.
    ///
    /// Fails if `base_iri` is empty or not an absolute IRI.
    pub fn new(base_iri: &str) -> Result<Self> {
        let resolver = Resolver::new(base_iri)?;
        Ok(Self {
            base_iri: resolver.base().to_string(),
            ..Self::default()
        })
    }

    pub fn with_ontology_iri(mut self, iri: &str) -> Result<Self> {
        let iri = iri.trim();
        if iri.is_empty() {
            return Err(ConversionError::InvalidConfiguration(
                "ontology IRI must not be empty".into(),
            ));
        }
        NamedNode::new(iri).map_err(|e| {
            ConversionError::InvalidConfiguration(format!("invalid ontology IRI {:?}: {}", iri, e))
        })?;
        self.ontology_iri = Some(iri.to_string());
        Ok(self)
    }

    pub fn with_prefixes(mut self, prefixes: BTreeMap<String, String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn with_cardinalities(mut self, enabled: bool) -> Self {
        self.use_cardinalities = enabled;
        self
    }

    pub fn with_skos_tags(mut self, enabled: bool) -> Self {
        self.skos_tags = enabled;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn base_iri(&self) -> &str {
        &self.base_iri
    }

    /// The configured ontology identifier, or `<base_iri>ontology`.
    pub fn ontology_iri(&self) -> String {
        self.ontology_iri
            .clone()
            .unwrap_or_else(|| format!("{}ontology", self.base_iri))
    }
}

/// Parse one `prefix=IRI` declaration.
///
/// `http` and `https` are refused as prefix names: bound in a JSON-LD
/// context they would turn every absolute IRI into a compact one.
pub fn parse_prefix(declaration: &str) -> Result<(String, String)> {
    let invalid = || {
        ConversionError::InvalidConfiguration(format!(
            "invalid prefix '{}'; expected format <prefix>=<IRI>",
            declaration
        ))
    };
    let (prefix, iri) = declaration.split_once('=').ok_or_else(invalid)?;
    let (prefix, iri) = (prefix.trim(), iri.trim());
    if prefix.is_empty() || iri.is_empty() || !PREFIX_RE.is_match(prefix) {
        return Err(invalid());
    }
    if RESERVED_PREFIXES.contains(&prefix.to_ascii_lowercase().as_str()) {
        return Err(ConversionError::InvalidConfiguration(format!(
            "prefix '{}' is reserved for IRI schemes",
            prefix
        )));
    }
    NamedNode::new(iri).map_err(|e| {
        ConversionError::InvalidConfiguration(format!("invalid prefix IRI {:?}: {}", iri, e))
    })?;
    Ok((prefix.to_string(), iri.to_string()))
}

/// Parse several declarations; later declarations of the same prefix win.
pub fn parse_prefixes<I, S>(declarations: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    declarations
        .into_iter()
        .map(|d| parse_prefix(d.as_ref()))
        .collect()
}

const RESERVED_PREFIXES: &[&str] = &["http", "https"];

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("invalid prefix regex"));
