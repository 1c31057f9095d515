//! Walks a metamodel document and emits the OWL/SKOS graph.
//!
//! Every unordered input collection is sorted (id, then name) before any
//! statement is produced, so the resulting graph depends only on the
//! document and the options.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use crate::cardinality::{encode_restriction, Cardinality};
use crate::config::ConversionOptions;
use crate::error::{ConversionError, Result};
use crate::graph::Graph;
use crate::namespace::{
    dcterms, owl, qualify_attribute_id, rdf, rdfs, skos, xsd, EntityIndex, Resolver,
    ResourceKind,
};
use crate::taxonomy::Taxonomy;
use crate::term::{self, Term};
use crate::types::{AttributeType, Document, EntityKind, RelationKind};

/// Build the graph for `document` under `options`.
///
/// Fails with [`ConversionError::MissingRequiredField`] before any statement
/// is produced if an entity has no id, and with
/// [`ConversionError::DuplicateEntityId`] if two entities share one.
pub fn build_graph(document: &Document, options: &ConversionOptions) -> Result<Graph> {
    GraphBuilder::new(options)?.build(document)
}

/// Stateful builder for one document. Consumed by [`GraphBuilder::build`].
#[derive(Debug)]
pub struct GraphBuilder<'a> {
    options: &'a ConversionOptions,
    resolver: Resolver,
    taxonomy: Taxonomy,
    ontology: Term,
    graph: Graph,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(options: &'a ConversionOptions) -> Result<Self> {
        let resolver = Resolver::new(options.base_iri())?;
        Ok(Self {
            options,
            taxonomy: Taxonomy::new(options.skos_tags),
            ontology: term::iri(options.ontology_iri()),
            resolver,
            graph: Graph::new(),
        })
    }

    pub fn build(mut self, document: &Document) -> Result<Graph> {
        let index = self.resolver.entity_index(&document.entity_kinds)?;

        self.bind_prefixes(!document.dictionaries.is_empty());
        self.add_header(document);
        self.add_dictionaries(document)?;
        self.add_entities(document);
        self.add_attributes(document, &index)?;
        self.add_relations(document, &index)?;

        info!(
            triples = self.graph.len(),
            entities = index.len(),
            relations = document.relation_kinds.len(),
            "built metamodel graph"
        );
        Ok(self.graph)
    }

    fn bind_prefixes(&mut self, with_dictionaries: bool) {
        let r = &self.resolver;
        let mut bindings = vec![
            ("base", r.base().to_string()),
            ("entity", r.namespace(ResourceKind::Entity)),
            ("attr", r.namespace(ResourceKind::Attribute)),
            ("rel", r.namespace(ResourceKind::Relation)),
            ("meta", r.namespace(ResourceKind::Meta)),
            ("owl", owl::NS.to_string()),
            ("rdf", rdf::NS.to_string()),
            ("rdfs", rdfs::NS.to_string()),
            ("xsd", xsd::NS.to_string()),
            ("dcterms", dcterms::NS.to_string()),
            ("skos", skos::NS.to_string()),
        ];
        if with_dictionaries {
            bindings.push(("dict", r.namespace(ResourceKind::Dictionary)));
        }
        for (prefix, ns) in bindings {
            self.graph.bind(prefix, ns);
        }
        for (prefix, ns) in &self.options.prefixes {
            self.graph.bind(prefix.as_str(), ns.as_str());
        }
    }

    fn add_header(&mut self, document: &Document) {
        self.graph
            .insert(self.ontology.clone(), rdf::TYPE, term::iri(owl::ONTOLOGY));

        // BTreeMap iteration is already lexicographic by key.
        for (key, value) in &document.meta {
            let Some(literal) = meta_literal(value) else {
                continue;
            };
            let predicate = match key.as_str() {
                "version" => dcterms::HAS_VERSION.to_string(),
                "model_name" => dcterms::TITLE.to_string(),
                "last_updated" => dcterms::MODIFIED.to_string(),
                other => self.resolver.meta_predicate(other),
            };
            self.graph.insert(self.ontology.clone(), &predicate, literal);
        }
        debug!(keys = document.meta.len(), "added ontology header");
    }

    fn add_dictionaries(&mut self, document: &Document) -> Result<()> {
        for (name, items) in &document.dictionaries {
            let scheme = self.resolver.scheme(name);
            self.graph
                .insert(scheme.clone(), rdf::TYPE, term::iri(skos::CONCEPT_SCHEME));
            self.graph
                .insert(scheme.clone(), rdfs::LABEL, term::literal(name.as_str()));

            let items = items.as_deref().unwrap_or_default();
            for (j, item) in sorted(items, |d| (d.id.as_deref(), d.name.as_deref())) {
                let id = require_id(item.id.as_deref(), || format!("$/dictionaries/{}/{}", name, j))?;
                let concept = self.resolver.concept(name, id);
                self.graph
                    .insert(concept.clone(), rdf::TYPE, term::iri(skos::CONCEPT));
                self.graph
                    .insert(concept.clone(), skos::IN_SCHEME, scheme.clone());
                if let Some(label) = non_empty(&item.name) {
                    self.graph
                        .insert(concept, skos::PREF_LABEL, term::literal(label));
                }
            }
        }
        debug!(dictionaries = document.dictionaries.len(), "added dictionaries");
        Ok(())
    }

    fn add_entities(&mut self, document: &Document) {
        for (_, entity) in sorted_entities(&document.entity_kinds) {
            // The index has already rejected entities without an id.
            let Some(id) = entity.id.as_deref() else {
                continue;
            };
            let subject = self.resolver.entity(id);
            self.graph
                .insert(subject.clone(), rdf::TYPE, term::iri(owl::CLASS));
            self.graph
                .insert(subject.clone(), rdfs::IS_DEFINED_BY, self.ontology.clone());

            self.describe(
                &subject,
                non_empty(&entity.name),
                non_empty(&entity.description),
                non_empty(&entity.rules),
            );
            for (lang, name) in entity.secondary_names() {
                self.taxonomy.alt_label(&mut self.graph, &subject, name, lang);
            }
            self.annotate(&subject, "category", non_empty(&entity.category));
            self.annotate(&subject, "metamodel_level", non_empty(&entity.metamodel_level));
        }
        debug!(entities = document.entity_kinds.len(), "added entities");
    }

    fn add_attributes(&mut self, document: &Document, index: &EntityIndex) -> Result<()> {
        let mut minted = HashSet::new();
        for (i, entity) in sorted_entities(&document.entity_kinds) {
            let Some(entity_id) = entity.id.as_deref() else {
                continue;
            };
            let Some(owner) = index.get(entity_id).cloned() else {
                continue;
            };
            for (j, attribute) in sorted(&entity.attributes, |a| (a.id.as_deref(), a.name.as_deref())) {
                let attr_id = require_id(attribute.id.as_deref(), || {
                    format!("$/entity_kinds/{}/attributes/{}", i, j)
                })?;
                let qualified = qualify_attribute_id(entity_id, attr_id);
                if !minted.insert(qualified.clone()) {
                    return Err(ConversionError::DuplicateAttributeId(qualified));
                }
                let subject = self.resolver.attribute(entity_id, attr_id);
                let props = attribute.properties.as_ref();
                let datatype =
                    AttributeType::resolve(props.and_then(|p| p.value_type.as_deref())).datatype();

                self.graph
                    .insert(subject.clone(), rdf::TYPE, term::iri(owl::DATATYPE_PROPERTY));
                self.graph
                    .insert(subject.clone(), rdfs::DOMAIN, owner.clone());
                self.graph
                    .insert(subject.clone(), rdfs::RANGE, term::iri(datatype));

                self.describe(
                    &subject,
                    non_empty(&attribute.name),
                    non_empty(&attribute.description),
                    None,
                );
                self.annotate(&subject, "metamodel_level", non_empty(&attribute.metamodel_level));

                if self.options.use_cardinalities {
                    encode_restriction(
                        &mut self.graph,
                        (entity_id, &owner),
                        (&qualified, &subject),
                        Cardinality::from_properties(props),
                    );
                }
            }
        }
        debug!(attributes = minted.len(), "added attributes");
        Ok(())
    }

    fn add_relations(&mut self, document: &Document, index: &EntityIndex) -> Result<()> {
        let relations = sorted(&document.relation_kinds, |r: &RelationKind| {
            (r.id.as_deref(), r.name.as_deref())
        });
        for (i, relation) in relations {
            let id = require_id(relation.id.as_deref(), || format!("$/relation_kinds/{}", i))?;
            let subject = self.resolver.relation(id);
            self.graph
                .insert(subject.clone(), rdf::TYPE, term::iri(owl::OBJECT_PROPERTY));

            // Domain and range are emitted together or not at all.
            let endpoint = |kind: &Option<String>| kind.as_deref().and_then(|k| index.get(k)).cloned();
            match (endpoint(&relation.from_kind), endpoint(&relation.to_kind)) {
                (Some(domain), Some(range)) => {
                    self.graph.insert(subject.clone(), rdfs::DOMAIN, domain);
                    self.graph.insert(subject.clone(), rdfs::RANGE, range);
                }
                _ => debug!(
                    relation = id,
                    from = ?relation.from_kind,
                    to = ?relation.to_kind,
                    "endpoint not resolved; domain and range omitted"
                ),
            }

            self.describe(
                &subject,
                non_empty(&relation.name),
                non_empty(&relation.description),
                non_empty(&relation.rules),
            );
            self.annotate(&subject, "metamodel_level", non_empty(&relation.metamodel_level));
            self.annotate(&subject, "direction", non_empty(&relation.direction));
        }
        debug!(relations = document.relation_kinds.len(), "added relations");
        Ok(())
    }

    /// Primary label/comment triples, each followed by its taxonomy mirror.
    fn describe(
        &mut self,
        subject: &Term,
        name: Option<&str>,
        description: Option<&str>,
        rules: Option<&str>,
    ) {
        if let Some(name) = name {
            self.graph
                .insert(subject.clone(), rdfs::LABEL, term::literal(name));
            self.taxonomy.pref_label(&mut self.graph, subject, name);
        }
        if let Some(description) = description {
            self.graph
                .insert(subject.clone(), rdfs::COMMENT, term::literal(description));
            self.taxonomy.definition(&mut self.graph, subject, description);
        }
        if let Some(rules) = rules {
            self.taxonomy.scope_note(&mut self.graph, subject, rules);
        }
    }

    /// `<subject> meta:<key> "value"` when a value is present.
    fn annotate(&mut self, subject: &Term, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            let predicate = self.resolver.meta_predicate(key);
            self.graph
                .insert(subject.clone(), &predicate, term::literal(value));
        }
    }
}

// --- helpers -----------------------------------------------------------------

/// Pair each item with its document index and order by (id, name). Absent
/// keys sort first; the sort is stable, so full ties keep document order.
fn sorted<'d, T, F>(items: &'d [T], key: F) -> Vec<(usize, &'d T)>
where
    F: Fn(&T) -> (Option<&str>, Option<&str>),
{
    let mut out: Vec<(usize, &T)> = items.iter().enumerate().collect();
    out.sort_by(|(_, a), (_, b)| key(a).cmp(&key(b)));
    out
}

fn sorted_entities(entities: &[EntityKind]) -> Vec<(usize, &EntityKind)> {
    sorted(entities, |e| (e.id.as_deref(), e.name.as_deref()))
}

fn require_id<'d>(id: Option<&'d str>, path: impl FnOnce() -> String) -> Result<&'d str> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ConversionError::MissingRequiredField { path: path() }),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Scalar metadata keeps its type; `null` is skipped.
fn meta_literal(value: &Value) -> Option<Term> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(term::literal(s.as_str())),
        Value::Bool(b) => Some(term::boolean(*b)),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            Some(term::typed_literal(n.to_string(), xsd::INTEGER))
        }
        Value::Number(n) => Some(term::typed_literal(n.to_string(), xsd::DOUBLE)),
        // Rejected by the schema contract; kept total for unvalidated input.
        other => Some(term::literal(other.to_string())),
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeKind, AttributeProperties, DictionaryItem};
    use serde_json::json;

    const BASE: &str = "http://example.com/test/";

    fn options() -> ConversionOptions {
        ConversionOptions::new(BASE).unwrap()
    }

    fn entity(id: &str, name: &str) -> EntityKind {
        EntityKind {
            id: Some(id.into()),
            name: Some(name.into()),
            ..EntityKind::default()
        }
    }

    fn relation(id: &str, from: &str, to: &str) -> RelationKind {
        RelationKind {
            id: Some(id.into()),
            from_kind: Some(from.into()),
            to_kind: Some(to.into()),
            ..RelationKind::default()
        }
    }

    fn e(id: &str) -> Term {
        term::iri(format!("{BASE}entity/{id}"))
    }

    fn rel(id: &str) -> Term {
        term::iri(format!("{BASE}relation/{id}"))
    }

    fn meta(key: &str) -> String {
        format!("{BASE}meta/{key}")
    }

    fn document() -> Document {
        let mut customer = entity("customer", "Customer");
        customer.description = Some("A party buying products".into());
        customer.rules = Some("Must be verified".into());
        customer.metamodel_level = Some("business_details".into());
        customer.category = Some("customer".into());
        customer.extra.insert("name_ru".into(), json!("Клиент"));
        customer.attributes = vec![AttributeKind {
            id: Some("customer.status".into()),
            name: Some("Status".into()),
            description: Some("Tracks whether the customer is active".into()),
            metamodel_level: None,
            properties: Some(AttributeProperties {
                value_type: Some("boolean".into()),
                min_cardinality: Some(1),
                max_cardinality: Some(1),
            }),
        }];

        let mut owns = relation("customer_to_account", "customer", "account");
        owns.name = Some("Customer to Account".into());
        owns.rules = Some("Customer must own the account".into());
        owns.direction = Some("directed".into());
        owns.metamodel_level = Some("business_details".into());

        Document {
            meta: [
                ("version".to_string(), json!("1.0")),
                ("model_name".to_string(), json!("Bank")),
                ("owner".to_string(), json!("architecture")),
                ("revision".to_string(), json!(3)),
                ("draft".to_string(), json!(null)),
            ]
            .into_iter()
            .collect(),
            dictionaries: [(
                "status_codes".to_string(),
                Some(vec![
                    DictionaryItem { id: Some("inactive".into()), name: None },
                    DictionaryItem { id: Some("active".into()), name: Some("Active".into()) },
                ]),
            )]
            .into_iter()
            .collect(),
            entity_kinds: vec![entity("account", "Account"), customer],
            relation_kinds: vec![owns],
        }
    }

    #[test]
    fn header_and_meta() {
        let g = build_graph(&document(), &options()).unwrap();
        let onto = term::iri(format!("{BASE}ontology"));
        assert!(g.contains(&onto, rdf::TYPE, &term::iri(owl::ONTOLOGY)));
        assert!(g.contains(&onto, dcterms::HAS_VERSION, &term::literal("1.0")));
        assert!(g.contains(&onto, dcterms::TITLE, &term::literal("Bank")));
        assert!(g.contains(&onto, &meta("owner"), &term::literal("architecture")));
        assert!(g.contains(&onto, &meta("revision"), &term::integer(3)));
        assert!(!g.has_property(&onto, &meta("draft")));
    }

    #[test]
    fn custom_ontology_iri() {
        let opts = options().with_ontology_iri("http://example.com/onto").unwrap();
        let g = build_graph(&document(), &opts).unwrap();
        let onto = term::iri("http://example.com/onto");
        assert!(g.contains(&onto, rdf::TYPE, &term::iri(owl::ONTOLOGY)));
        assert!(g.contains(&e("customer"), rdfs::IS_DEFINED_BY, &onto));
    }

    #[test]
    fn dictionaries_become_concept_schemes() {
        let g = build_graph(&document(), &options()).unwrap();
        let scheme = term::iri(format!("{BASE}dictionary/status_codes"));
        let active = term::iri(format!("{BASE}dictionary/status_codes/active"));
        let inactive = term::iri(format!("{BASE}dictionary/status_codes/inactive"));
        assert!(g.contains(&scheme, rdf::TYPE, &term::iri(skos::CONCEPT_SCHEME)));
        assert!(g.contains(&scheme, rdfs::LABEL, &term::literal("status_codes")));
        assert!(g.contains(&active, skos::IN_SCHEME, &scheme));
        assert!(g.contains(&active, skos::PREF_LABEL, &term::literal("Active")));
        assert!(g.contains(&inactive, rdf::TYPE, &term::iri(skos::CONCEPT)));
        assert!(!g.has_property(&inactive, skos::PREF_LABEL));
        assert!(g.prefixes().contains_key("dict"));
    }

    #[test]
    fn entity_triples_without_taxonomy() {
        // Dictionary concepts always carry skos:prefLabel; leave them out here.
        let mut doc = document();
        doc.dictionaries.clear();
        let g = build_graph(&doc, &options()).unwrap();
        let c = e("customer");
        assert!(g.contains(&c, rdf::TYPE, &term::iri(owl::CLASS)));
        assert!(g.contains(&c, rdfs::LABEL, &term::literal("Customer")));
        assert!(g.contains(&c, rdfs::COMMENT, &term::literal("A party buying products")));
        assert!(g.contains(&c, &meta("category"), &term::literal("customer")));
        assert!(g.contains(&c, &meta("metamodel_level"), &term::literal("business_details")));
        for p in [skos::PREF_LABEL, skos::ALT_LABEL, skos::DEFINITION, skos::SCOPE_NOTE] {
            assert!(!g.triples().any(|t| t.predicate.as_str() == p), "{p} emitted with taxonomy off");
        }
    }

    #[test]
    fn entity_triples_with_taxonomy() {
        let g = build_graph(&document(), &options().with_skos_tags(true)).unwrap();
        let c = e("customer");
        assert!(g.contains(&c, skos::PREF_LABEL, &term::literal("Customer")));
        assert!(g.contains(&c, skos::ALT_LABEL, &term::lang_literal("Клиент", "ru")));
        assert!(g.contains(&c, skos::DEFINITION, &term::literal("A party buying products")));
        assert!(g.contains(&c, skos::SCOPE_NOTE, &term::literal("Must be verified")));
        assert!(g.contains(&e("account"), skos::PREF_LABEL, &term::literal("Account")));
    }

    #[test]
    fn attribute_triples() {
        let g = build_graph(&document(), &options().with_skos_tags(true)).unwrap();
        let a = term::iri(format!("{BASE}attribute/customer.status"));
        assert!(g.contains(&a, rdf::TYPE, &term::iri(owl::DATATYPE_PROPERTY)));
        assert!(g.contains(&a, rdfs::DOMAIN, &e("customer")));
        assert!(g.contains(&a, rdfs::RANGE, &term::iri(xsd::BOOLEAN)));
        assert!(g.contains(
            &a,
            skos::DEFINITION,
            &term::literal("Tracks whether the customer is active")
        ));
        // Cardinalities are off by default.
        assert!(!g.triples().any(|t| t.object == term::iri(owl::RESTRICTION)));
    }

    #[test]
    fn attribute_type_defaults_to_string() {
        let mut doc = document();
        doc.entity_kinds[0].attributes = vec![
            AttributeKind {
                id: Some("number".into()),
                properties: Some(AttributeProperties {
                    value_type: Some("iban".into()),
                    ..AttributeProperties::default()
                }),
                ..AttributeKind::default()
            },
            AttributeKind {
                id: Some("opened".into()),
                ..AttributeKind::default()
            },
        ];
        let g = build_graph(&doc, &options()).unwrap();
        for id in ["account.number", "account.opened"] {
            let a = term::iri(format!("{BASE}attribute/{id}"));
            assert_eq!(g.objects(&a, rdfs::RANGE), vec![&term::iri(xsd::STRING)]);
        }
    }

    #[test]
    fn cardinality_restriction_when_enabled() {
        let g = build_graph(&document(), &options().with_cardinalities(true)).unwrap();
        let restrictions = g.subjects(rdf::TYPE, &term::iri(owl::RESTRICTION));
        assert_eq!(restrictions.len(), 1);
        let r = &restrictions[0];
        assert_eq!(r, &term::blank("customer__customer.status__restriction"));
        assert!(g.contains(r, owl::MIN_CARDINALITY, &term::integer(1)));
        assert!(g.contains(r, owl::MAX_CARDINALITY, &term::integer(1)));
        assert!(g.contains(&e("customer"), rdfs::SUB_CLASS_OF, r));
    }

    #[test]
    fn relation_domain_and_range() {
        let g = build_graph(&document(), &options().with_skos_tags(true)).unwrap();
        let r = rel("customer_to_account");
        assert!(g.contains(&r, rdf::TYPE, &term::iri(owl::OBJECT_PROPERTY)));
        assert!(g.contains(&r, rdfs::DOMAIN, &e("customer")));
        assert!(g.contains(&r, rdfs::RANGE, &e("account")));
        assert!(g.contains(&r, skos::SCOPE_NOTE, &term::literal("Customer must own the account")));
        assert!(g.contains(&r, &meta("direction"), &term::literal("directed")));
        assert!(g.contains(&r, &meta("metamodel_level"), &term::literal("business_details")));
    }

    #[test]
    fn dangling_relation_endpoints_are_omitted() {
        let mut doc = document();
        doc.relation_kinds = vec![
            relation("to_ghost", "customer", "ghost"),
            relation("from_ghost", "ghost", "account"),
            relation("owns", "customer", "account"),
        ];
        let g = build_graph(&doc, &options()).unwrap();
        // One unresolved side drops both triples.
        for id in ["to_ghost", "from_ghost"] {
            let r = rel(id);
            assert!(g.contains(&r, rdf::TYPE, &term::iri(owl::OBJECT_PROPERTY)));
            assert!(!g.has_property(&r, rdfs::DOMAIN), "{id} has a domain");
            assert!(!g.has_property(&r, rdfs::RANGE), "{id} has a range");
        }
        let owns = rel("owns");
        assert!(g.contains(&owns, rdfs::DOMAIN, &e("customer")));
        assert!(g.contains(&owns, rdfs::RANGE, &e("account")));
    }

    #[test]
    fn attributes_minting_the_same_identifier_fail() {
        let mut doc = document();
        let attribute = |id: &str| AttributeKind {
            id: Some(id.into()),
            ..AttributeKind::default()
        };
        let mut a = entity("a", "A");
        a.attributes = vec![attribute("b.c")];
        let mut ab = entity("a.b", "AB");
        ab.attributes = vec![attribute("c")];
        doc.entity_kinds = vec![a, ab];
        let err = build_graph(&doc, &options()).unwrap_err();
        assert!(matches!(err, ConversionError::DuplicateAttributeId(ref id) if id == "a.b.c"));
    }

    #[test]
    fn relation_without_level_gets_no_level_triple() {
        let mut doc = document();
        doc.relation_kinds = vec![relation("plain", "customer", "account")];
        let g = build_graph(&doc, &options()).unwrap();
        let r = rel("plain");
        assert!(!g.has_property(&r, &meta("metamodel_level")));
        assert!(!g.has_property(&r, &meta("direction")));
    }

    #[test]
    fn missing_entity_id_fails_before_any_triple() {
        let mut doc = document();
        doc.entity_kinds.push(EntityKind::default());
        let err = build_graph(&doc, &options()).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MissingRequiredField { ref path } if path == "$/entity_kinds/2"
        ));
    }

    #[test]
    fn missing_relation_id_fails() {
        let mut doc = document();
        doc.relation_kinds.push(RelationKind::default());
        let err = build_graph(&doc, &options()).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MissingRequiredField { ref path } if path == "$/relation_kinds/1"
        ));
    }

    #[test]
    fn user_prefixes_are_bound() {
        let opts = options().with_prefixes(
            [("ex".to_string(), "http://example.org/".to_string())]
                .into_iter()
                .collect(),
        );
        let g = build_graph(&document(), &opts).unwrap();
        assert_eq!(g.prefixes()["ex"], "http://example.org/");
        assert_eq!(g.prefixes()["entity"], format!("{BASE}entity/"));
    }

    #[test]
    fn input_order_does_not_matter() {
        let doc = document();
        let mut shuffled = doc.clone();
        shuffled.entity_kinds.reverse();
        shuffled.relation_kinds.reverse();
        let a = build_graph(&doc, &options().with_skos_tags(true)).unwrap();
        let b = build_graph(&shuffled, &options().with_skos_tags(true)).unwrap();
        let ta: Vec<String> = a.sorted().iter().map(|t| t.to_string()).collect();
        let tb: Vec<String> = b.sorted().iter().map(|t| t.to_string()).collect();
        assert_eq!(ta, tb);
    }
}
