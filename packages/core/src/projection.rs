//! The simplified entity/relation shape consumed by diagram generators.
//!
//! This projection reads the typed [`Document`] directly; it never looks at
//! the semantic graph. Missing optional fields take fixed defaults so that a
//! diagram always has something to print.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ConversionError, Result};
use crate::types::Document;

/// Group key used for entities that have no value for the grouping field.
pub const NOT_SET: &str = "(not set)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramEntity {
    pub id: String,
    /// Falls back to `id`.
    pub name: String,
    /// Metamodel level; empty when not declared.
    pub level: String,
    /// Falls back to `"other"`.
    pub category: String,
    pub description: Option<String>,
    /// Every remaining field of the record except `attributes`.
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramRelation {
    pub id: String,
    pub name: String,
    /// Id of the `from_kind` entity; empty when not declared.
    pub source: String,
    /// Id of the `to_kind` entity; empty when not declared.
    pub target: String,
    pub level: String,
    /// Falls back to `"association"`.
    pub category: String,
    /// Falls back to `"directed"`.
    pub direction: String,
    pub description: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metamodel {
    pub entities: Vec<DiagramEntity>,
    pub relations: Vec<DiagramRelation>,
}

impl Metamodel {
    /// Project `document`, keeping document order.
    ///
    /// Records without an id fail with
    /// [`ConversionError::MissingRequiredField`].
    pub fn from_document(document: &Document) -> Result<Self> {
        let mut entities = Vec::with_capacity(document.entity_kinds.len());
        for (i, e) in document.entity_kinds.iter().enumerate() {
            let id = required(e.id.as_deref(), || format!("$/entity_kinds/{}", i))?;
            let mut extra = e.extra.clone();
            if let Some(rules) = &e.rules {
                extra.insert("rules".into(), Value::String(rules.clone()));
            }
            entities.push(DiagramEntity {
                name: e.name.clone().unwrap_or_else(|| id.clone()),
                level: e.metamodel_level.clone().unwrap_or_default(),
                category: e.category.clone().unwrap_or_else(|| "other".into()),
                description: e.description.clone(),
                extra,
                id,
            });
        }

        let mut relations = Vec::with_capacity(document.relation_kinds.len());
        for (i, r) in document.relation_kinds.iter().enumerate() {
            let id = required(r.id.as_deref(), || format!("$/relation_kinds/{}", i))?;
            let mut extra = r.extra.clone();
            if let Some(rules) = &r.rules {
                extra.insert("rules".into(), Value::String(rules.clone()));
            }
            relations.push(DiagramRelation {
                name: r.name.clone().unwrap_or_else(|| id.clone()),
                source: r.from_kind.clone().unwrap_or_default(),
                target: r.to_kind.clone().unwrap_or_default(),
                level: r.metamodel_level.clone().unwrap_or_default(),
                category: r.category.clone().unwrap_or_else(|| "association".into()),
                direction: r.direction.clone().unwrap_or_else(|| "directed".into()),
                description: r.description.clone(),
                extra,
                id,
            });
        }

        Ok(Self { entities, relations })
    }

    /// Keep the entities whose level belongs to `view`, and the relations
    /// whose endpoints both survive.
    pub fn filter(&self, view: View) -> Metamodel {
        let Some(levels) = view.levels() else {
            return self.clone();
        };
        let entities: Vec<DiagramEntity> = self
            .entities
            .iter()
            .filter(|e| levels.contains(&e.level.as_str()))
            .cloned()
            .collect();
        let relations = self
            .relations
            .iter()
            .filter(|r| {
                entities.iter().any(|e| e.id == r.source) && entities.iter().any(|e| e.id == r.target)
            })
            .cloned()
            .collect();
        Metamodel { entities, relations }
    }
}

fn required(id: Option<&str>, path: impl FnOnce() -> String) -> Result<String> {
    match id {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ConversionError::MissingRequiredField { path: path() }),
    }
}

/// A named slice of the metamodel by abstraction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    All,
    Strategic,
    Business,
    Solution,
    Data,
    Infra,
    /// Cross-cutting view; keeps everything.
    Horizontal,
}

impl View {
    pub const ALL: [View; 7] = [
        View::All,
        View::Strategic,
        View::Business,
        View::Solution,
        View::Data,
        View::Infra,
        View::Horizontal,
    ];

    /// Metamodel levels shown in this view, or `None` for no filtering.
    pub fn levels(self) -> Option<&'static [&'static str]> {
        match self {
            View::All | View::Horizontal => None,
            View::Strategic => Some(&["strategic_view"]),
            View::Business => Some(&["business_details"]),
            View::Solution => Some(&["solution_details", "component_details"]),
            View::Data => Some(&["data_details"]),
            View::Infra => Some(&["infrastructure_details"]),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::All => "all",
            View::Strategic => "strategic",
            View::Business => "business",
            View::Solution => "solution",
            View::Data => "data",
            View::Infra => "infra",
            View::Horizontal => "horizontal",
        };
        f.write_str(name)
    }
}

impl FromStr for View {
    type Err = ConversionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| ConversionError::InvalidConfiguration(format!("unknown view '{}'", s)))
    }
}

/// Group entities by `field`, which may name one of the projected fields
/// (`id`, `name`, `level`, `category`, `description`) or any extra field.
/// Entities with no value, or an empty one, land under [`NOT_SET`].
pub fn group_entities<'a>(
    entities: &'a [DiagramEntity],
    field: &str,
) -> BTreeMap<String, Vec<&'a DiagramEntity>> {
    let mut groups: BTreeMap<String, Vec<&DiagramEntity>> = BTreeMap::new();
    for entity in entities {
        let value = match field {
            "id" => Some(entity.id.clone()),
            "name" => Some(entity.name.clone()),
            "level" => Some(entity.level.clone()),
            "category" => Some(entity.category.clone()),
            "description" => entity.description.clone(),
            other => entity.extra.get(other).and_then(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                v => Some(v.to_string()),
            }),
        };
        let key = value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| NOT_SET.to_string());
        groups.entry(key).or_default().push(entity);
    }
    groups
}
