//! Schema definitions - the source the code tables are derived from.
//!
//! A schema lists entity types (each with flat attributes and optional
//! nested attribute groups) and groups of relation names. Tables are derived
//! as follows:
//! - entity types keep their declaration order
//! - attributes are flattened to `Group.Name`, de-duplicated, and sorted
//! - relations are collected from every group, de-duplicated, and sorted

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::code_table::{CodeTable, CodeTables, TableKind};
use crate::error::Result;

/// The schema shipped with the crate.
pub const BUILTIN_SCHEMA: &str = include_str!("builtin.toml");

/// One entity type and the attributes it may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Flat attribute names.
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Nested attribute groups, e.g. `Appearance -> [Gender, Posture]`.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl EntityTypeDefinition {
    /// Attribute labels with nested groups flattened to `Group.Name`.
    pub fn flattened_attributes(&self) -> impl Iterator<Item = String> + '_ {
        let flat = self.attributes.iter().cloned();
        let nested = self.groups.iter().flat_map(|(group, names)| {
            names.iter().map(move |name| format!("{group}.{name}"))
        });
        flat.chain(nested)
    }
}

/// A complete schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub entity_types: Vec<EntityTypeDefinition>,

    /// Relation names by thematic group. A name may appear in several groups.
    #[serde(default)]
    pub relations: BTreeMap<String, Vec<String>>,
}

impl SchemaDefinition {
    /// Parse a schema from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The schema shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SCHEMA)
    }

    /// Get an entity type definition by name.
    pub fn entity_type(&self, name: &str) -> Option<&EntityTypeDefinition> {
        self.entity_types.iter().find(|e| e.name == name)
    }

    /// Sorted, de-duplicated attribute labels across all entity types.
    pub fn attribute_labels(&self) -> Vec<String> {
        self.entity_types
            .iter()
            .flat_map(|e| e.flattened_attributes())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, de-duplicated relation labels across all groups.
    pub fn relation_labels(&self) -> Vec<String> {
        self.relations
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl CodeTables {
    /// Derive all three tables from a schema.
    pub fn from_schema(schema: &SchemaDefinition) -> Result<Self> {
        let entity_types = schema.entity_types.iter().map(|e| e.name.clone());

        Ok(Self {
            entity_types: CodeTable::from_labels(TableKind::EntityType, entity_types)?,
            attributes: CodeTable::from_labels(TableKind::Attribute, schema.attribute_labels())?,
            relations: CodeTable::from_labels(TableKind::Relation, schema.relation_labels())?,
        })
    }
}
