use std::collections::{BTreeMap, HashSet};

use oxrdf::{NamedNode, Subject};

use crate::term::{self, Term, Triple};

/// An in-memory set of triples plus the prefix bindings used to abbreviate
/// identifiers when the graph is serialized.
///
/// The graph has set semantics: inserting the same statement twice is a
/// no-op. Storage order is unspecified; use [`Graph::sorted`] whenever order
/// matters.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    triples: HashSet<Triple>,
    prefixes: BTreeMap<String, String>,
}

impl Graph {
    /// Create an empty graph with no prefix bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`, replacing any earlier binding of the
    /// same prefix.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Prefix bindings in prefix order.
    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    /// Insert a statement. Returns `false` if it was already present, or if
    /// `subject` is a literal and so cannot head a statement.
    pub fn insert(&mut self, subject: Term, predicate: &str, object: Term) -> bool {
        let Some(subject) = term::as_subject(&subject) else {
            return false;
        };
        self.triples.insert(Triple::new(
            subject,
            NamedNode::new_unchecked(predicate),
            object,
        ))
    }

    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        let Some(subject) = term::as_subject(subject) else {
            return false;
        };
        self.triples.contains(&Triple::new(
            subject,
            NamedNode::new_unchecked(predicate),
            object.clone(),
        ))
    }

    /// True if `subject` has at least one value for `predicate`.
    pub fn has_property(&self, subject: &Term, predicate: &str) -> bool {
        self.triples
            .iter()
            .any(|t| is_subject(&t.subject, subject) && t.predicate.as_str() == predicate)
    }

    /// All objects of `(subject, predicate, ?)`, sorted by textual form.
    pub fn objects(&self, subject: &Term, predicate: &str) -> Vec<&Term> {
        let mut out: Vec<&Term> = self
            .triples
            .iter()
            .filter(|t| is_subject(&t.subject, subject) && t.predicate.as_str() == predicate)
            .map(|t| &t.object)
            .collect();
        out.sort_by_cached_key(|o| o.to_string());
        out
    }

    /// All subjects of `(?, predicate, object)`, sorted by textual form.
    pub fn subjects(&self, predicate: &str, object: &Term) -> Vec<Term> {
        let mut out: Vec<Term> = self
            .triples
            .iter()
            .filter(|t| t.predicate.as_str() == predicate && &t.object == object)
            .map(|t| Term::from(t.subject.clone()))
            .collect();
        out.sort_by_cached_key(|s| s.to_string());
        out
    }

    /// Number of distinct statements.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all statements in unspecified order.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All statements ordered lexicographically by the textual form of
    /// subject, then predicate, then object.
    pub fn sorted(&self) -> Vec<&Triple> {
        let mut out: Vec<&Triple> = self.triples.iter().collect();
        out.sort_by_cached_key(|t| {
            (
                t.subject.to_string(),
                t.predicate.as_str().to_string(),
                t.object.to_string(),
            )
        });
        out
    }

    /// Split `iri` into `(prefix, local)` using the longest bound namespace
    /// that is a proper prefix of it. Ties resolve to the smaller prefix name.
    pub fn compact<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.len() > ns.len() && iri.starts_with(ns.as_str()))
            .max_by(|(pa, a), (pb, b)| a.len().cmp(&b.len()).then_with(|| pb.cmp(pa)))
            .map(|(prefix, ns)| (prefix.as_str(), &iri[ns.len()..]))
    }
}

fn is_subject(subject: &Subject, term: &Term) -> bool {
    match (subject, term) {
        (Subject::NamedNode(a), Term::NamedNode(b)) => a == b,
        (Subject::BlankNode(a), Term::BlankNode(b)) => a == b,
        _ => false,
    }
}

// --- tests -------------------------------------------------------------------
