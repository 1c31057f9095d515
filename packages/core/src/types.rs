//! Typed records of a metamodel document.
//!
//! A [`Document`] is deserialized from the generic tree only after the schema
//! contract has accepted it, so most fields are simple `Option<String>`s.
//! Identifiers stay optional as well: the builder reports a missing id as
//! [`ConversionError::MissingRequiredField`](crate::ConversionError) instead of
//! relying on deserialization failing.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::namespace::xsd;

/// The whole metamodel document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Free-form scalar metadata describing the model.
    #[serde(default, deserialize_with = "nullable")]
    pub meta: BTreeMap<String, Value>,

    /// Controlled vocabularies: dictionary name → items. A `null` item list
    /// is treated as empty.
    #[serde(default, deserialize_with = "nullable")]
    pub dictionaries: BTreeMap<String, Option<Vec<DictionaryItem>>>,

    #[serde(default, deserialize_with = "nullable")]
    pub entity_kinds: Vec<EntityKind>,

    #[serde(default, deserialize_with = "nullable")]
    pub relation_kinds: Vec<RelationKind>,
}

/// One entry of a dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DictionaryItem {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A domain concept; becomes an `owl:Class`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityKind {
    pub id: Option<String>,
    pub name: Option<String>,
    pub metamodel_level: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub attributes: Vec<AttributeKind>,

    /// Every other field, including secondary-language names (`name_ru`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EntityKind {
    /// Secondary-language names declared as `name_<lang>` fields, in language
    /// tag order. Empty values are skipped.
    pub fn secondary_names(&self) -> Vec<(&str, &str)> {
        self.extra
            .iter()
            .filter_map(|(key, value)| {
                let lang = SECONDARY_NAME_RE.captures(key)?.get(1)?.as_str();
                match value.as_str() {
                    Some(name) if !name.is_empty() => Some((lang, name)),
                    _ => None,
                }
            })
            .collect()
    }
}

/// `name_<lang>` where `<lang>` is a two or three letter language tag.
static SECONDARY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^name_([a-z]{2,3})$").expect("invalid secondary name regex"));

/// A scalar property owned by exactly one entity; becomes an
/// `owl:DatatypeProperty`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttributeKind {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub metamodel_level: Option<String>,
    pub properties: Option<AttributeProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttributeProperties {
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub min_cardinality: Option<u64>,
    pub max_cardinality: Option<u64>,
}

/// An association between two entities; becomes an `owl:ObjectProperty`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelationKind {
    pub id: Option<String>,
    pub name: Option<String>,
    pub from_kind: Option<String>,
    pub to_kind: Option<String>,
    pub metamodel_level: Option<String>,
    pub category: Option<String>,
    pub direction: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The declared value type of an attribute.
///
/// Parses from the lowercase names used in documents. Use
/// [`AttributeType::resolve`] for the total mapping that falls back to
/// [`AttributeType::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeType {
    #[default]
    String,
    Integer,
    /// Arbitrary-precision number, mapped to `xsd:decimal`.
    Number,
    Boolean,
    Date,
    DateTime,
}

impl AttributeType {
    /// Resolve a declared type; absent or unrecognized types are strings.
    pub fn resolve(declared: Option<&str>) -> Self {
        declared
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// The XML Schema datatype this type maps to.
    pub fn datatype(self) -> &'static str {
        match self {
            AttributeType::String => xsd::STRING,
            AttributeType::Integer => xsd::INTEGER,
            AttributeType::Number => xsd::DECIMAL,
            AttributeType::Boolean => xsd::BOOLEAN,
            AttributeType::Date => xsd::DATE,
            AttributeType::DateTime => xsd::DATE_TIME,
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Integer => write!(f, "integer"),
            AttributeType::Number => write!(f, "number"),
            AttributeType::Boolean => write!(f, "boolean"),
            AttributeType::Date => write!(f, "date"),
            AttributeType::DateTime => write!(f, "datetime"),
        }
    }
}

impl std::str::FromStr for AttributeType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(AttributeType::String),
            "integer" => Ok(AttributeType::Integer),
            "number" => Ok(AttributeType::Number),
            "boolean" => Ok(AttributeType::Boolean),
            "date" => Ok(AttributeType::Date),
            "datetime" => Ok(AttributeType::DateTime),
            _ => Err(format!(
                "unknown attribute type {:?}; expected one of: \
                 string, integer, number, boolean, date, datetime",
                s
            )),
        }
    }
}

/// Deserialize `null` as the type's default, so `entity_kinds: ~` reads as an
/// empty list.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- tests -------------------------------------------------------------------
