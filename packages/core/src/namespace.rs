//! Identifier minting and the well-known vocabularies used by the builder.
//!
//! Every identifier in the output graph is produced here, so the builder and
//! its extensions never concatenate namespaces by hand.

use std::collections::BTreeMap;

use tracing::debug;

use oxrdf::NamedNode;

use crate::error::{ConversionError, Result};
use crate::term::{self, Term};
use crate::types::EntityKind;

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    pub const IS_DEFINED_BY: &str = "http://www.w3.org/2000/01/rdf-schema#isDefinedBy";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
}

pub mod owl {
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";
    pub const ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    pub const RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    pub const ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    pub const MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";
    pub const MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

pub mod skos {
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
    pub const IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
    pub const SCOPE_NOTE: &str = "http://www.w3.org/2004/02/skos/core#scopeNote";
}

pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";
    pub const HAS_VERSION: &str = "http://purl.org/dc/terms/hasVersion";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
}

/// The resource families that identifiers are minted for. Each kind owns one
/// path segment under the base namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Entity,
    Attribute,
    Relation,
    Dictionary,
    Meta,
}

impl ResourceKind {
    pub fn segment(self) -> &'static str {
        match self {
            ResourceKind::Entity => "entity",
            ResourceKind::Attribute => "attribute",
            ResourceKind::Relation => "relation",
            ResourceKind::Dictionary => "dictionary",
            ResourceKind::Meta => "meta",
        }
    }
}

/// Append `/` to `base` unless it already ends with `/` or `#`.
fn ensure_trailing_separator(base: &str) -> String {
    if base.ends_with('/') || base.ends_with('#') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// Mints identifiers under one base namespace.
#[derive(Debug, Clone)]
pub struct Resolver {
    base: String,
}

impl Resolver {
    /// Create a resolver for `base`, normalizing the trailing separator.
    ///
    /// Fails with [`ConversionError::InvalidConfiguration`] if `base` is empty
    /// or not an absolute IRI.
    pub fn new(base: &str) -> Result<Self> {
        let base = base.trim();
        if base.is_empty() {
            return Err(ConversionError::InvalidConfiguration(
                "base namespace must not be empty".into(),
            ));
        }
        let base = ensure_trailing_separator(base);
        NamedNode::new(base.as_str()).map_err(|e| {
            ConversionError::InvalidConfiguration(format!("invalid base namespace {:?}: {}", base, e))
        })?;
        Ok(Self { base })
    }

    /// The normalized base namespace.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The namespace for one resource kind, e.g. `<base>entity/`.
    pub fn namespace(&self, kind: ResourceKind) -> String {
        format!("{}{}/", self.base, kind.segment())
    }

    /// `<base><kind>/<id>`.
    pub fn mint(&self, kind: ResourceKind, id: &str) -> String {
        format!("{}{}/{}", self.base, kind.segment(), id)
    }

    pub fn entity(&self, id: &str) -> Term {
        term::iri(self.mint(ResourceKind::Entity, id))
    }

    /// Attribute identifiers are always qualified by their owning entity:
    /// `status` on `customer` and `customer.status` both mint
    /// `<base>attribute/customer.status`.
    pub fn attribute(&self, entity_id: &str, attribute_id: &str) -> Term {
        term::iri(self.mint(
            ResourceKind::Attribute,
            &qualify_attribute_id(entity_id, attribute_id),
        ))
    }

    pub fn relation(&self, id: &str) -> Term {
        term::iri(self.mint(ResourceKind::Relation, id))
    }

    /// The concept scheme for a dictionary.
    pub fn scheme(&self, scheme: &str) -> Term {
        term::iri(self.mint(ResourceKind::Dictionary, scheme))
    }

    /// A concept inside a dictionary: `<base>dictionary/<scheme>/<item>`.
    pub fn concept(&self, scheme: &str, item_id: &str) -> Term {
        term::iri(format!("{}/{}", self.mint(ResourceKind::Dictionary, scheme), item_id))
    }

    /// Predicate IRI for a `meta/<key>` annotation.
    pub fn meta_predicate(&self, key: &str) -> String {
        self.mint(ResourceKind::Meta, key)
    }

    /// The default ontology identifier: `<base>ontology`.
    pub fn default_ontology(&self) -> String {
        format!("{}ontology", self.base)
    }

    /// Resolve every entity id up front.
    ///
    /// Fails with [`ConversionError::MissingRequiredField`] for an entity
    /// without an id and [`ConversionError::DuplicateEntityId`] for a repeated
    /// one; no triple has been produced at that point.
    pub fn entity_index(&self, entities: &[EntityKind]) -> Result<EntityIndex> {
        let mut by_id = BTreeMap::new();
        for (i, entity) in entities.iter().enumerate() {
            let id = match entity.id.as_deref() {
                Some(id) if !id.is_empty() => id,
                _ => {
                    return Err(ConversionError::MissingRequiredField {
                        path: format!("$/entity_kinds/{}", i),
                    })
                }
            };
            if by_id.insert(id.to_string(), self.entity(id)).is_some() {
                return Err(ConversionError::DuplicateEntityId(id.to_string()));
            }
        }
        debug!(entities = by_id.len(), "built entity index");
        Ok(EntityIndex { by_id })
    }
}

/// `status` on `customer` → `customer.status`; an id already qualified by
/// its owner is kept as-is.
pub fn qualify_attribute_id(entity_id: &str, attribute_id: &str) -> String {
    match attribute_id.strip_prefix(entity_id) {
        Some(rest) if rest.starts_with('.') => attribute_id.to_string(),
        _ => format!("{}.{}", entity_id, attribute_id),
    }
}

/// Entity id → identifier, resolved once per document.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    by_id: BTreeMap<String, Term>,
}

impl EntityIndex {
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.by_id.get(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::iri;

    fn entity(id: Option<&str>) -> EntityKind {
        EntityKind {
            id: id.map(Into::into),
            ..EntityKind::default()
        }
    }

    #[test]
    fn base_is_normalized() {
        assert_eq!(Resolver::new("http://x").unwrap().base(), "http://x/");
        assert_eq!(Resolver::new("http://x/").unwrap().base(), "http://x/");
        assert_eq!(Resolver::new("http://x#").unwrap().base(), "http://x#");
    }

    #[test]
    fn empty_base_is_rejected() {
        assert!(matches!(
            Resolver::new("  "),
            Err(ConversionError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Resolver::new("bank"),
            Err(ConversionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn minting() {
        let r = Resolver::new("http://x/").unwrap();
        assert_eq!(r.entity("customer"), iri("http://x/entity/customer"));
        assert_eq!(r.relation("owns"), iri("http://x/relation/owns"));
        assert_eq!(r.scheme("status"), iri("http://x/dictionary/status"));
        assert_eq!(
            r.concept("status", "active"),
            iri("http://x/dictionary/status/active")
        );
        assert_eq!(r.meta_predicate("owner"), "http://x/meta/owner");
        assert_eq!(r.default_ontology(), "http://x/ontology");
        assert_eq!(r.namespace(ResourceKind::Attribute), "http://x/attribute/");
    }

    #[test]
    fn attributes_are_entity_qualified() {
        let r = Resolver::new("http://x/").unwrap();
        let expected = iri("http://x/attribute/customer.status");
        assert_eq!(r.attribute("customer", "customer.status"), expected);
        assert_eq!(r.attribute("customer", "status"), expected);
        // A shared textual prefix is not a qualification.
        assert_eq!(
            r.attribute("customer", "customer_status"),
            iri("http://x/attribute/customer.customer_status")
        );
    }

    #[test]
    fn index_rejects_missing_and_duplicate_ids() {
        let r = Resolver::new("http://x/").unwrap();
        let err = r.entity_index(&[entity(Some("a")), entity(None)]).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MissingRequiredField { ref path } if path == "$/entity_kinds/1"
        ));

        let err = r.entity_index(&[entity(Some("a")), entity(Some("a"))]).unwrap_err();
        assert!(matches!(err, ConversionError::DuplicateEntityId(ref id) if id == "a"));

        let index = r.entity_index(&[entity(Some("a")), entity(Some("b"))]).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("b"), Some(&iri("http://x/entity/b")));
        assert_eq!(index.get("c"), None);
    }
}
