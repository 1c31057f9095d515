//! Constructors for the RDF terms the builder emits.
//!
//! Terms and triples are [`oxrdf`] values. The helpers here build them from
//! identifiers the [`Resolver`](crate::Resolver) has already minted and from
//! blank labels that are valid by construction, so none of them can fail.

pub use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};

use crate::namespace::xsd;

pub fn iri(iri: impl Into<String>) -> Term {
    NamedNode::new_unchecked(iri).into()
}

/// `label` must already be a valid blank node label; see
/// [`restriction_label`](crate::cardinality::restriction_label).
pub fn blank(label: impl Into<String>) -> Term {
    BlankNode::new_unchecked(label).into()
}

pub fn literal(value: impl Into<String>) -> Term {
    Literal::new_simple_literal(value).into()
}

/// A language-tagged string, e.g. `"Клиент"@ru`.
pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Term {
    Literal::new_language_tagged_literal_unchecked(value, lang.into().to_ascii_lowercase()).into()
}

pub fn typed_literal(value: impl Into<String>, datatype: &str) -> Term {
    Literal::new_typed_literal(value, NamedNode::new_unchecked(datatype)).into()
}

pub fn integer(value: i64) -> Term {
    typed_literal(value.to_string(), xsd::INTEGER)
}

pub fn boolean(value: bool) -> Term {
    typed_literal(value.to_string(), xsd::BOOLEAN)
}

/// The term as a statement subject. Literals cannot be subjects.
pub fn as_subject(term: &Term) -> Option<Subject> {
    match term {
        Term::NamedNode(n) => Some(n.clone().into()),
        Term::BlankNode(b) => Some(b.clone().into()),
        _ => None,
    }
}

/// The IRI, if `term` is one.
pub fn as_iri(term: &Term) -> Option<&str> {
    match term {
        Term::NamedNode(n) => Some(n.as_str()),
        _ => None,
    }
}
