//! SKOS annotations layered on top of the primary RDFS vocabulary.
//!
//! Every method is a no-op while the layer is disabled, and also when the
//! record's primary counterpart is not in the graph yet: a `skos:prefLabel`
//! needs the matching `rdfs:label`, a `skos:definition` the matching
//! `rdfs:comment`, and a `skos:scopeNote` a typed record.

use crate::graph::Graph;
use crate::namespace::{rdf, rdfs, skos};
use crate::term::{self, Term};

#[derive(Debug, Clone, Copy, Default)]
pub struct Taxonomy {
    enabled: bool,
}

impl Taxonomy {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn pref_label(&self, graph: &mut Graph, subject: &Term, name: &str) -> bool {
        let label = term::literal(name);
        if !self.enabled || !graph.contains(subject, rdfs::LABEL, &label) {
            return false;
        }
        graph.insert(subject.clone(), skos::PREF_LABEL, label)
    }

    pub fn alt_label(&self, graph: &mut Graph, subject: &Term, name: &str, lang: &str) -> bool {
        if !self.enabled || !graph.has_property(subject, rdfs::LABEL) {
            return false;
        }
        graph.insert(subject.clone(), skos::ALT_LABEL, term::lang_literal(name, lang))
    }

    pub fn definition(&self, graph: &mut Graph, subject: &Term, text: &str) -> bool {
        let comment = term::literal(text);
        if !self.enabled || !graph.contains(subject, rdfs::COMMENT, &comment) {
            return false;
        }
        graph.insert(subject.clone(), skos::DEFINITION, comment)
    }

    pub fn scope_note(&self, graph: &mut Graph, subject: &Term, rules: &str) -> bool {
        if !self.enabled || !graph.has_property(subject, rdf::TYPE) {
            return false;
        }
        graph.insert(subject.clone(), skos::SCOPE_NOTE, term::literal(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::owl;

    fn subject() -> Term {
        term::iri("http://x/entity/customer")
    }

    fn labelled() -> Graph {
        let mut g = Graph::new();
        g.insert(subject(), rdf::TYPE, term::iri(owl::CLASS));
        g.insert(subject(), rdfs::LABEL, term::literal("Customer"));
        g.insert(subject(), rdfs::COMMENT, term::literal("A buyer"));
        g
    }

    #[test]
    fn disabled_layer_emits_nothing() {
        let mut g = labelled();
        let t = Taxonomy::new(false);
        assert!(!t.pref_label(&mut g, &subject(), "Customer"));
        assert!(!t.alt_label(&mut g, &subject(), "Клиент", "ru"));
        assert!(!t.definition(&mut g, &subject(), "A buyer"));
        assert!(!t.scope_note(&mut g, &subject(), "Must exist"));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn enabled_layer_mirrors_primary_triples() {
        let mut g = labelled();
        let t = Taxonomy::new(true);
        assert!(t.pref_label(&mut g, &subject(), "Customer"));
        assert!(t.alt_label(&mut g, &subject(), "Клиент", "ru"));
        assert!(t.definition(&mut g, &subject(), "A buyer"));
        assert!(t.scope_note(&mut g, &subject(), "Must exist"));
        assert!(g.contains(&subject(), skos::ALT_LABEL, &term::lang_literal("Клиент", "ru")));
    }

    #[test]
    fn never_emits_without_primary_counterpart() {
        let mut g = Graph::new();
        let t = Taxonomy::new(true);
        assert!(!t.pref_label(&mut g, &subject(), "Customer"));
        assert!(!t.alt_label(&mut g, &subject(), "Клиент", "ru"));
        assert!(!t.definition(&mut g, &subject(), "A buyer"));
        assert!(!t.scope_note(&mut g, &subject(), "Must exist"));
        assert!(g.is_empty());

        // A label with different text is not a counterpart.
        let mut g = labelled();
        assert!(!t.pref_label(&mut g, &subject(), "Client"));
    }
}
