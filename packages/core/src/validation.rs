//! The schema contract a raw document must satisfy before any graph work.
//!
//! The contract is pluggable through [`SchemaValidator`]. [`MetamodelSchema`]
//! is the built-in contract; it reports *every* violation it finds (not just
//! the first) so users can fix a document in one pass.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::namespace::qualify_attribute_id;

/// One location in the document that breaks the contract.
///
/// `path` is `$` followed by one `/segment` per mapping key or list index,
/// e.g. `$/entity_kinds/0/attributes/1/id`. `context` holds sub-violations
/// explaining why a value matched none of several alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
    pub context: Vec<Violation>,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            context: Vec::new(),
        }
    }
}

/// Accepts or rejects a raw document.
///
/// An empty result means the document is accepted.
pub trait SchemaValidator {
    fn validate(&self, document: &Value) -> Vec<Violation>;
}

/// The default metamodel contract.
#[derive(Debug, Clone, Default)]
pub struct MetamodelSchema {
    required_meta: Vec<String>,
}

impl MetamodelSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require these keys to be present in the `meta` block.
    pub fn with_required_meta<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_meta = keys.into_iter().map(Into::into).collect();
        self
    }
}

impl SchemaValidator for MetamodelSchema {
    fn validate(&self, document: &Value) -> Vec<Violation> {
        let mut out = Vec::new();
        let Some(root) = document.as_object() else {
            out.push(Violation::new("$", format!("{} is not of type 'object'", document)));
            return out;
        };

        match root.get("meta") {
            None if !self.required_meta.is_empty() => {
                out.push(Violation::new("$", "'meta' is a required property"));
            }
            None => {}
            Some(meta) => self.check_meta(meta, &mut out),
        }
        if let Some(dicts) = root.get("dictionaries") {
            check_dictionaries(dicts, &mut out);
        }
        if let Some(entities) = root.get("entity_kinds") {
            check_entities(entities, &mut out);
        }
        if let Some(relations) = root.get("relation_kinds") {
            check_relations(relations, &mut out);
        }

        out.sort_by(|a, b| a.path.cmp(&b.path));
        out
    }
}

impl MetamodelSchema {
    fn check_meta(&self, meta: &Value, out: &mut Vec<Violation>) {
        let path = "$/meta";
        let Some(map) = expect_object(meta, path, out) else {
            return;
        };
        for key in &self.required_meta {
            if !map.contains_key(key) {
                out.push(Violation::new(path, format!("'{}' is a required property", key)));
            }
        }
        for (key, value) in map {
            if !KEY_RE.is_match(key) {
                out.push(Violation::new(
                    path,
                    format!("{:?} does not match '{}'", key, KEY_RE.as_str()),
                ));
            }
            let item_path = format!("{}/{}", path, key);
            if !is_scalar(value) {
                out.push(Violation {
                    path: item_path.clone(),
                    message: format!("{} is not valid under any of the given schemas", value),
                    context: ["string", "number", "boolean", "null"]
                        .iter()
                        .map(|t| Violation::new(&item_path, format!("{} is not of type '{}'", value, t)))
                        .collect(),
                });
            }
        }
    }
}

fn check_dictionaries(dicts: &Value, out: &mut Vec<Violation>) {
    let path = "$/dictionaries";
    let Some(map) = expect_object(dicts, path, out) else {
        return;
    };
    for (name, items) in map {
        if !KEY_RE.is_match(name) {
            out.push(Violation::new(
                path,
                format!("{:?} does not match '{}'", name, KEY_RE.as_str()),
            ));
        }
        let dict_path = format!("{}/{}", path, name);
        if items.is_null() {
            continue;
        }
        let Some(list) = expect_array(items, &dict_path, out) else {
            continue;
        };
        for (i, item) in list.iter().enumerate() {
            let item_path = format!("{}/{}", dict_path, i);
            if let Some(obj) = expect_object(item, &item_path, out) {
                require_id(obj, &item_path, out);
                check_strings(obj, &item_path, &["name"], out);
            }
        }
    }
}

fn check_entities(entities: &Value, out: &mut Vec<Violation>) {
    let path = "$/entity_kinds";
    let Some(list) = expect_array(entities, path, out) else {
        return;
    };
    let mut seen = HashSet::new();
    // Qualified attribute id → path of the attribute that minted it.
    let mut minted = HashMap::new();
    for (i, entity) in list.iter().enumerate() {
        let entity_path = format!("{}/{}", path, i);
        let Some(obj) = expect_object(entity, &entity_path, out) else {
            continue;
        };
        let entity_id = require_id(obj, &entity_path, out);
        if let Some(id) = entity_id {
            if !seen.insert(id) {
                out.push(Violation::new(
                    format!("{}/id", entity_path),
                    format!("duplicate entity id {:?}", id),
                ));
            }
        }
        check_strings(
            obj,
            &entity_path,
            &["name", "metamodel_level", "category", "description", "rules"],
            out,
        );
        for (key, value) in obj {
            if key.starts_with("name_") && !value.is_string() && !value.is_null() {
                out.push(Violation::new(
                    format!("{}/{}", entity_path, key),
                    format!("{} is not of type 'string'", value),
                ));
            }
        }
        if let Some(attrs) = obj.get("attributes").filter(|v| !v.is_null()) {
            let attrs_path = format!("{}/attributes", entity_path);
            check_attributes(attrs, &attrs_path, entity_id, &mut minted, out);
        }
    }
}

/// Besides per-entity uniqueness, every attribute must mint an identifier no
/// other attribute mints: `a` + `b.c` and `a.b` + `c` both qualify to `a.b.c`.
fn check_attributes(
    attrs: &Value,
    path: &str,
    entity_id: Option<&str>,
    minted: &mut HashMap<String, String>,
    out: &mut Vec<Violation>,
) {
    let Some(list) = expect_array(attrs, path, out) else {
        return;
    };
    let mut seen = HashSet::new();
    for (i, attr) in list.iter().enumerate() {
        let attr_path = format!("{}/{}", path, i);
        let Some(obj) = expect_object(attr, &attr_path, out) else {
            continue;
        };
        if let Some(id) = require_id(obj, &attr_path, out) {
            if !seen.insert(id) {
                out.push(Violation::new(
                    format!("{}/id", attr_path),
                    format!("duplicate attribute id {:?} within entity", id),
                ));
            } else if let Some(entity_id) = entity_id {
                let qualified = qualify_attribute_id(entity_id, id);
                if let Some(other) = minted.get(&qualified) {
                    out.push(Violation::new(
                        format!("{}/id", attr_path),
                        format!("attribute identifier {:?} is already minted by {}", qualified, other),
                    ));
                } else {
                    minted.insert(qualified, attr_path.clone());
                }
            }
        }
        check_strings(obj, &attr_path, &["name", "description", "metamodel_level"], out);
        if let Some(props) = obj.get("properties").filter(|v| !v.is_null()) {
            check_properties(props, &format!("{}/properties", attr_path), out);
        }
    }
}

fn check_properties(props: &Value, path: &str, out: &mut Vec<Violation>) {
    let Some(obj) = expect_object(props, path, out) else {
        return;
    };
    check_strings(obj, path, &["type"], out);
    let mut bound = |key: &str| -> Option<u64> {
        let value = obj.get(key).filter(|v| !v.is_null())?;
        match value.as_u64() {
            Some(n) => Some(n),
            None => {
                out.push(Violation::new(
                    format!("{}/{}", path, key),
                    format!("{} is not a non-negative integer", value),
                ));
                None
            }
        }
    };
    let min = bound("min_cardinality");
    let max = bound("max_cardinality");
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            out.push(Violation::new(
                path,
                format!("min_cardinality {} is greater than max_cardinality {}", min, max),
            ));
        }
    }
}

fn check_relations(relations: &Value, out: &mut Vec<Violation>) {
    let path = "$/relation_kinds";
    let Some(list) = expect_array(relations, path, out) else {
        return;
    };
    let mut seen = HashSet::new();
    for (i, relation) in list.iter().enumerate() {
        let rel_path = format!("{}/{}", path, i);
        let Some(obj) = expect_object(relation, &rel_path, out) else {
            continue;
        };
        if let Some(id) = require_id(obj, &rel_path, out) {
            if !seen.insert(id) {
                out.push(Violation::new(
                    format!("{}/id", rel_path),
                    format!("duplicate relation id {:?}", id),
                ));
            }
        }
        check_strings(
            obj,
            &rel_path,
            &[
                "name",
                "from_kind",
                "to_kind",
                "metamodel_level",
                "category",
                "direction",
                "description",
                "rules",
            ],
            out,
        );
    }
}

// --- helpers -----------------------------------------------------------------

fn expect_object<'a>(value: &'a Value, path: &str, out: &mut Vec<Violation>) -> Option<&'a Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
        out.push(Violation::new(path, format!("{} is not of type 'object'", value)));
    }
    obj
}

fn expect_array<'a>(value: &'a Value, path: &str, out: &mut Vec<Violation>) -> Option<&'a Vec<Value>> {
    let list = value.as_array();
    if list.is_none() {
        out.push(Violation::new(path, format!("{} is not of type 'array'", value)));
    }
    list
}

/// Check the `id` field and return it when it is usable.
fn require_id<'a>(obj: &'a Map<String, Value>, path: &str, out: &mut Vec<Violation>) -> Option<&'a str> {
    let Some(value) = obj.get("id") else {
        out.push(Violation::new(path, "'id' is a required property"));
        return None;
    };
    let id_path = format!("{}/id", path);
    let Some(id) = value.as_str() else {
        out.push(Violation::new(id_path, format!("{} is not of type 'string'", value)));
        return None;
    };
    if !ID_RE.is_match(id) {
        out.push(Violation::new(
            id_path,
            format!("{:?} is not a valid identifier (empty or contains whitespace or reserved characters)", id),
        ));
        return None;
    }
    Some(id)
}

/// Every listed key, when present and non-null, must be a string.
fn check_strings(obj: &Map<String, Value>, path: &str, keys: &[&str], out: &mut Vec<Violation>) {
    for key in keys {
        if let Some(value) = obj.get(*key) {
            if !value.is_string() && !value.is_null() {
                out.push(Violation::new(
                    format!("{}/{}", path, key),
                    format!("{} is not of type 'string'", value),
                ));
            }
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null
    )
}

/// Meta keys and dictionary names become identifier path segments and XML
/// element names, so they are restricted to name characters.
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("invalid key regex"));

/// Non-empty, no whitespace, none of the characters IRIs forbid.
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^\s<>"{}|\\^`]+$"#).expect("invalid id regex"));

// --- tests -------------------------------------------------------------------
