//! OWL cardinality restrictions for attributes.

use crate::graph::Graph;
use crate::namespace::{owl, rdf, rdfs, xsd};
use crate::term::{self, Term};
use crate::types::AttributeProperties;

/// Optional lower and upper bounds on how many values an attribute takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cardinality {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Cardinality {
    pub fn from_properties(props: Option<&AttributeProperties>) -> Self {
        props.map_or_else(Self::default, |p| Self {
            min: p.min_cardinality,
            max: p.max_cardinality,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Label of the restriction node for one attribute of one entity.
///
/// Derived only from the two ids so the node is named identically on every
/// run: `customer` + `customer.status` → `customer__customer.status__restriction`.
///
/// Distinct id pairs always give distinct labels. Each id is escaped so that
/// `_` appears only as the start of a `_HH` byte escape, which leaves `__`
/// free to separate the parts. The result is a valid Turtle blank node label
/// and a valid XML `rdf:nodeID`.
pub fn restriction_label(entity_id: &str, attribute_id: &str) -> String {
    format!(
        "{}__{}__restriction",
        escape_label_part(entity_id),
        escape_label_part(attribute_id)
    )
}

/// Keep ASCII letters, digits and inner `-`/`.`; escape every other byte
/// as `_HH`. A leading non-letter is escaped so the label starts with a name
/// start character.
fn escape_label_part(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let last = id.len().saturating_sub(1);
    for (i, c) in id.char_indices() {
        let keep = if i == 0 {
            c.is_ascii_alphabetic()
        } else {
            c.is_ascii_alphanumeric() || c == '-' || (c == '.' && i != last)
        };
        if keep {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("_{:02X}", byte));
            }
        }
    }
    out
}

/// Emit an `owl:Restriction` on the attribute and make the entity a subclass
/// of it. Both arguments pair an id with its minted identifier. Returns the
/// restriction node, or `None` when neither bound is set.
pub fn encode_restriction(
    graph: &mut Graph,
    (entity_id, entity): (&str, &Term),
    (attribute_id, attribute): (&str, &Term),
    bounds: Cardinality,
) -> Option<Term> {
    if bounds.is_unbounded() {
        return None;
    }
    let restriction = term::blank(restriction_label(entity_id, attribute_id));
    graph.insert(restriction.clone(), rdf::TYPE, term::iri(owl::RESTRICTION));
    graph.insert(restriction.clone(), owl::ON_PROPERTY, attribute.clone());
    if let Some(min) = bounds.min {
        graph.insert(
            restriction.clone(),
            owl::MIN_CARDINALITY,
            term::typed_literal(min.to_string(), xsd::INTEGER),
        );
    }
    if let Some(max) = bounds.max {
        graph.insert(
            restriction.clone(),
            owl::MAX_CARDINALITY,
            term::typed_literal(max.to_string(), xsd::INTEGER),
        );
    }
    graph.insert(entity.clone(), rdfs::SUB_CLASS_OF, restriction.clone());
    Some(restriction)
}
