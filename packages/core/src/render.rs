//! Textual encodings of a finished [`Graph`].
//!
//! Turtle and RDF/XML are written by `oxttl` and `oxrdfxml`; JSON-LD is
//! assembled with `serde_json`. All three walk [`Graph::sorted`], so the
//! output for a given graph is byte-identical no matter how its statements
//! were inserted. Only prefixes that abbreviate something are declared.

use std::collections::BTreeSet;
use std::io;

use oxrdfxml::RdfXmlSerializer;
use oxttl::TurtleSerializer;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{ConversionError, Result};
use crate::graph::Graph;
use crate::namespace::{rdf, xsd};
use crate::term::{Subject, Term, Triple};

/// Supported output encodings.
///
/// Parses from `turtle`/`ttl`, `rdfxml`/`xml` and `jsonld`/`json-ld`; any
/// other name is [`ConversionError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Turtle,
    RdfXml,
    JsonLd,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Turtle => write!(f, "turtle"),
            Format::RdfXml => write!(f, "rdfxml"),
            Format::JsonLd => write!(f, "jsonld"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = ConversionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Format::Turtle),
            "rdfxml" | "xml" => Ok(Format::RdfXml),
            "jsonld" | "json-ld" => Ok(Format::JsonLd),
            _ => Err(ConversionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Render `graph` in `format`.
pub fn render_graph(graph: &Graph, format: Format) -> Result<String> {
    let triples = graph.sorted();
    debug!(%format, triples = triples.len(), "serializing graph");
    match format {
        Format::Turtle => render_turtle(graph, &triples),
        Format::RdfXml => render_rdfxml(graph, &triples),
        Format::JsonLd => render_jsonld(graph, &triples),
    }
}

// --- turtle ------------------------------------------------------------------

fn render_turtle(graph: &Graph, triples: &[&Triple]) -> Result<String> {
    let mut serializer = TurtleSerializer::new();
    for (prefix, ns) in used_prefixes(graph, triples) {
        serializer = serializer
            .with_prefix(prefix, ns)
            .map_err(|e| ConversionError::Serialization(format!("prefix {}: {}", prefix, e)))?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for &t in triples {
        writer.serialize_triple(t).map_err(io_error)?;
    }
    into_text(writer.finish().map_err(io_error)?)
}

// --- rdf/xml -----------------------------------------------------------------

/// Predicates become element names; the serializer rejects one that cannot
/// be split into a namespace and an XML name.
fn render_rdfxml(graph: &Graph, triples: &[&Triple]) -> Result<String> {
    let mut serializer = RdfXmlSerializer::new();
    // `rdf` is always declared by the serializer itself.
    for (prefix, ns) in used_prefixes(graph, triples) {
        if prefix == "rdf" || ns == rdf::NS {
            continue;
        }
        serializer = serializer
            .with_prefix(prefix, ns)
            .map_err(|e| ConversionError::Serialization(format!("prefix {}: {}", prefix, e)))?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for &t in triples {
        writer.serialize_triple(t).map_err(io_error)?;
    }
    into_text(writer.finish().map_err(io_error)?)
}

fn io_error(e: io::Error) -> ConversionError {
    ConversionError::Serialization(e.to_string())
}

fn into_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| ConversionError::Serialization(e.to_string()))
}

// --- json-ld -----------------------------------------------------------------

/// ```text
/// {
///   "@context": {
///     "entity": "http://example.com/metamodel/entity/",
///     "owl": "http://www.w3.org/2002/07/owl#"
///   },
///   "@graph": [
///     { "@id": "entity:customer", "@type": "owl:Class" }
///   ]
/// }
/// ```
fn render_jsonld(graph: &Graph, triples: &[&Triple]) -> Result<String> {
    let mut names = Names::new(graph);
    let mut nodes = Vec::new();

    for group in by_subject(triples) {
        let mut node = Map::new();
        node.insert("@id".into(), Value::String(names.node_id(&group[0].subject)));
        for (predicate, objects) in by_predicate(&group) {
            let (key, values): (String, Vec<Value>) = if predicate == rdf::TYPE {
                let types = objects
                    .iter()
                    .map(|o| match o {
                        Term::NamedNode(n) => Value::String(names.curie(n.as_str())),
                        Term::BlankNode(b) => Value::String(format!("_:{}", b.as_str())),
                        other => names.json_value(other),
                    })
                    .collect();
                ("@type".into(), types)
            } else {
                let values = objects.iter().map(|o| names.json_value(o)).collect();
                (names.curie(predicate), values)
            };
            let value = if values.len() == 1 {
                values.into_iter().next().unwrap_or(Value::Null)
            } else {
                Value::Array(values)
            };
            node.insert(key, value);
        }
        nodes.push(Value::Object(node));
    }

    let context: Map<String, Value> = names
        .used_bindings()
        .into_iter()
        .map(|(p, ns)| (p.to_string(), Value::String(ns.to_string())))
        .collect();
    let document = json!({ "@context": context, "@graph": nodes });
    let mut out = serde_json::to_string_pretty(&document)
        .map_err(|e| ConversionError::Serialization(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

// --- shared helpers ----------------------------------------------------------

/// `(prefix, namespace)` for every binding that abbreviates at least one
/// identifier in `triples`, in prefix order.
fn used_prefixes<'g>(graph: &'g Graph, triples: &[&'g Triple]) -> Vec<(&'g str, &'g str)> {
    let mut used: BTreeSet<&str> = BTreeSet::new();
    for &t in triples {
        let subject = match &t.subject {
            Subject::NamedNode(n) => Some(n.as_str()),
            _ => None,
        };
        let object = match &t.object {
            Term::NamedNode(n) => Some(n.as_str()),
            Term::Literal(lit) if lit.language().is_none() && lit.datatype().as_str() != xsd::STRING => {
                Some(lit.datatype().as_str())
            }
            _ => None,
        };
        for iri in [subject, Some(t.predicate.as_str()), object].into_iter().flatten() {
            if let Some((prefix, _)) = graph.compact(iri) {
                used.insert(prefix);
            }
        }
    }
    graph
        .prefixes()
        .iter()
        .filter(|(p, _)| used.contains(p.as_str()))
        .map(|(p, ns)| (p.as_str(), ns.as_str()))
        .collect()
}

/// Abbreviates identifiers for JSON-LD with the graph's bindings and
/// remembers which prefixes were used.
struct Names<'g> {
    graph: &'g Graph,
    used: BTreeSet<&'g str>,
}

impl<'g> Names<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            used: BTreeSet::new(),
        }
    }

    /// `(prefix, namespace)` for every prefix used so far, in prefix order.
    fn used_bindings(&self) -> Vec<(&'g str, &'g str)> {
        self.graph
            .prefixes()
            .iter()
            .filter(|(p, _)| self.used.contains(p.as_str()))
            .map(|(p, ns)| (p.as_str(), ns.as_str()))
            .collect()
    }

    /// Compact IRI; any non-empty local part qualifies.
    fn curie(&mut self, iri: &str) -> String {
        let graph = self.graph;
        let Some((prefix, local)) = graph.compact(iri) else {
            return iri.to_string();
        };
        if local.starts_with("//") {
            return iri.to_string();
        }
        let Some((prefix, _)) = graph.prefixes().get_key_value(prefix) else {
            return iri.to_string();
        };
        self.used.insert(prefix.as_str());
        format!("{}:{}", prefix, local)
    }

    fn node_id(&mut self, subject: &Subject) -> String {
        match subject {
            Subject::NamedNode(n) => self.curie(n.as_str()),
            Subject::BlankNode(b) => format!("_:{}", b.as_str()),
        }
    }

    fn json_value(&mut self, term: &Term) -> Value {
        match term {
            Term::NamedNode(n) => json!({ "@id": self.curie(n.as_str()) }),
            Term::BlankNode(b) => json!({ "@id": format!("_:{}", b.as_str()) }),
            Term::Literal(lit) => {
                let lexical = lit.value();
                if let Some(lang) = lit.language() {
                    return json!({ "@language": lang, "@value": lexical });
                }
                let datatype = lit.datatype().as_str();
                if datatype == xsd::STRING {
                    return Value::String(lexical.to_string());
                }
                if datatype == xsd::INTEGER {
                    if let Ok(n) = lexical.parse::<i64>() {
                        return Value::from(n);
                    }
                }
                if datatype == xsd::BOOLEAN {
                    if let Ok(b) = lexical.parse::<bool>() {
                        return Value::Bool(b);
                    }
                }
                json!({ "@type": self.curie(datatype), "@value": lexical })
            }
        }
    }
}

/// Consecutive runs of statements sharing a subject. `triples` must already
/// be sorted.
fn by_subject<'t>(triples: &[&'t Triple]) -> Vec<Vec<&'t Triple>> {
    let mut groups: Vec<Vec<&Triple>> = Vec::new();
    for &t in triples {
        match groups.last_mut() {
            Some(group) if group[0].subject == t.subject => group.push(t),
            _ => groups.push(vec![t]),
        }
    }
    groups
}

/// Objects per predicate within one subject, `rdf:type` first and the rest in
/// predicate order.
fn by_predicate<'t>(group: &[&'t Triple]) -> Vec<(&'t str, Vec<&'t Term>)> {
    let mut out: Vec<(&str, Vec<&Term>)> = Vec::new();
    for &t in group {
        match out.last_mut() {
            Some((p, objects)) if *p == t.predicate.as_str() => objects.push(&t.object),
            _ => out.push((t.predicate.as_str(), vec![&t.object])),
        }
    }
    out.sort_by_key(|(p, _)| *p != rdf::TYPE);
    out
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use oxrdfxml::RdfXmlParser;
    use oxttl::TurtleParser;

    use super::*;
    use crate::namespace::{owl, rdfs, skos};
    use crate::term::{blank, integer, iri, lang_literal, literal};

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.bind("entity", "http://x/entity/");
        g.bind("attr", "http://x/attribute/");
        g.bind("meta", "http://x/meta/");
        g.bind("owl", owl::NS);
        g.bind("rdf", rdf::NS);
        g.bind("rdfs", rdfs::NS);
        g.bind("skos", skos::NS);
        g.bind("xsd", xsd::NS);
        g.bind("unused", "http://unused.example/");

        let c = iri("http://x/entity/customer");
        let a = iri("http://x/attribute/customer.status");
        let r = blank("customer__customer.status__restriction");
        g.insert(c.clone(), rdf::TYPE, iri(owl::CLASS));
        g.insert(c.clone(), rdfs::LABEL, literal("Customer \"VIP\"\nline two"));
        g.insert(c.clone(), skos::ALT_LABEL, lang_literal("Клиент", "ru"));
        g.insert(c.clone(), "http://x/meta/metamodel_level", literal("business_details"));
        g.insert(c.clone(), rdfs::SUB_CLASS_OF, r.clone());
        g.insert(a.clone(), rdf::TYPE, iri(owl::DATATYPE_PROPERTY));
        g.insert(a.clone(), rdfs::RANGE, iri(xsd::BOOLEAN));
        g.insert(r.clone(), rdf::TYPE, iri(owl::RESTRICTION));
        g.insert(r.clone(), owl::ON_PROPERTY, a.clone());
        g.insert(r.clone(), owl::MIN_CARDINALITY, integer(1));
        g
    }

    fn statements(g: &Graph) -> HashSet<Triple> {
        g.triples().cloned().collect()
    }

    fn parse_turtle(text: &str) -> HashSet<Triple> {
        TurtleParser::new()
            .for_reader(text.as_bytes())
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    fn parse_rdfxml(text: &str) -> HashSet<Triple> {
        RdfXmlParser::new()
            .for_reader(text.as_bytes())
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn format_names() {
        assert_eq!("turtle".parse::<Format>().unwrap(), Format::Turtle);
        assert_eq!("TTL".parse::<Format>().unwrap(), Format::Turtle);
        assert_eq!("rdfxml".parse::<Format>().unwrap(), Format::RdfXml);
        assert_eq!("json-ld".parse::<Format>().unwrap(), Format::JsonLd);
        assert!(matches!(
            "ntriples".parse::<Format>(),
            Err(ConversionError::UnsupportedFormat(ref f)) if f == "ntriples"
        ));
        assert_eq!(Format::RdfXml.to_string(), "rdfxml");
    }

    #[test]
    fn turtle_reads_back_as_the_same_graph() {
        let g = sample();
        let out = render_graph(&g, Format::Turtle).unwrap();
        assert_eq!(parse_turtle(&out), statements(&g));
    }

    #[test]
    fn turtle_declares_only_used_prefixes() {
        let out = render_graph(&sample(), Format::Turtle).unwrap();
        assert!(out.contains("@prefix attr: <http://x/attribute/> ."));
        assert!(out.contains("@prefix skos: <http://www.w3.org/2004/02/skos/core#> ."));
        assert!(!out.contains("unused"));
    }

    #[test]
    fn turtle_without_bindings_uses_full_iris() {
        let mut g = Graph::new();
        g.bind("base", "http://x/");
        g.insert(iri("http://y/meta/owner"), rdfs::LABEL, literal("o"));
        let out = render_graph(&g, Format::Turtle).unwrap();
        assert!(out.contains("<http://y/meta/owner>"));
        assert!(!out.contains("@prefix"));
        assert_eq!(parse_turtle(&out), statements(&g));
    }

    #[test]
    fn rdfxml_reads_back_as_the_same_graph() {
        let g = sample();
        let out = render_graph(&g, Format::RdfXml).unwrap();
        assert!(!out.contains("unused"));
        assert!(out.contains("rdf:nodeID=\"customer__customer.status__restriction\""));
        assert_eq!(parse_rdfxml(&out), statements(&g));
    }

    #[test]
    fn rdfxml_handles_unbound_predicate_namespaces() {
        let mut g = Graph::new();
        g.insert(iri("http://x/s"), "http://other.example/vocab#prop", literal("v"));
        let out = render_graph(&g, Format::RdfXml).unwrap();
        assert!(out.contains("http://other.example/vocab#"));
        assert_eq!(parse_rdfxml(&out), statements(&g));
    }

    #[test]
    fn jsonld_output() {
        let out = render_graph(&sample(), Format::JsonLd).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["@context"]["entity"], "http://x/entity/");
        assert!(v["@context"].get("unused").is_none());

        let nodes = v["@graph"].as_array().unwrap();
        let customer = nodes.iter().find(|n| n["@id"] == "entity:customer").unwrap();
        assert_eq!(customer["@type"], "owl:Class");
        assert_eq!(customer["rdfs:label"], "Customer \"VIP\"\nline two");
        assert_eq!(customer["skos:altLabel"], json!({"@language": "ru", "@value": "Клиент"}));
        assert_eq!(
            customer["rdfs:subClassOf"],
            json!({"@id": "_:customer__customer.status__restriction"})
        );

        let restriction = nodes
            .iter()
            .find(|n| n["@id"] == "_:customer__customer.status__restriction")
            .unwrap();
        assert_eq!(restriction["owl:minCardinality"], 1);
        assert_eq!(restriction["owl:onProperty"], json!({"@id": "attr:customer.status"}));
    }

    #[test]
    fn every_format_is_deterministic() {
        // Same statements inserted in reverse order.
        let g1 = sample();
        let mut g2 = Graph::new();
        for (p, ns) in g1.prefixes() {
            g2.bind(p.as_str(), ns.as_str());
        }
        let mut triples: Vec<&Triple> = g1.sorted();
        triples.reverse();
        for t in triples {
            g2.insert(
                Term::from(t.subject.clone()),
                t.predicate.as_str(),
                t.object.clone(),
            );
        }
        for format in [Format::Turtle, Format::RdfXml, Format::JsonLd] {
            assert_eq!(
                render_graph(&g1, format).unwrap(),
                render_graph(&g2, format).unwrap(),
                "{format}"
            );
        }
    }

    #[test]
    fn empty_graph_renders() {
        let g = Graph::new();
        assert!(parse_turtle(&render_graph(&g, Format::Turtle).unwrap()).is_empty());
        let json: Value =
            serde_json::from_str(&render_graph(&g, Format::JsonLd).unwrap()).unwrap();
        assert_eq!(json["@graph"], json!([]));
    }
}
