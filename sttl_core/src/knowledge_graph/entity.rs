//! Entity records - nodes in the knowledge graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use sttl_schema::{BEHAVIOR_ATTRIBUTE, NAME_ATTRIBUTE};

/// Synthetic attribute key holding an entity's raw mentions.
pub const MENTIONS_KEY: &str = "mentions";

/// Separator between individual mentions inside the mentions value.
pub const MENTION_SEPARATOR: &str = "||";

/// Separator between a nested attribute group and its member (`Appearance.Gender`).
pub const ATTRIBUTE_PATH_SEPARATOR: char = '.';

/// A declared entity with its type label and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,

    /// Type label, or `"Unknown"` when the type code was not recognized.
    pub entity_type: String,

    /// Attribute label -> value, including the optional `"mentions"` key.
    pub attributes: BTreeMap<String, String>,
}

impl EntityRecord {
    /// Create an entity with no attributes.
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(label.into(), value.into());
        self
    }

    /// Get an attribute value.
    pub fn attribute(&self, label: &str) -> Option<&str> {
        self.attributes.get(label).map(String::as_str)
    }

    /// Get an attribute value, treating an empty value as absent.
    pub fn non_empty_attribute(&self, label: &str) -> Option<&str> {
        self.attribute(label).filter(|v| !v.is_empty())
    }

    /// The `Name` attribute when present and non-empty, otherwise the entity name.
    pub fn display_name(&self) -> &str {
        self.non_empty_attribute(NAME_ATTRIBUTE).unwrap_or(&self.name)
    }

    /// The `Behavior` attribute when present and non-empty.
    pub fn behavior(&self) -> Option<&str> {
        self.non_empty_attribute(BEHAVIOR_ATTRIBUTE)
    }

    /// The raw mentions value, if one was captured.
    pub fn mentions(&self) -> Option<&str> {
        self.attribute(MENTIONS_KEY)
    }

    /// Individual mentions, split on `||` with blanks dropped.
    pub fn mention_list(&self) -> Vec<&str> {
        self.mentions()
            .map(|raw| {
                raw.split(MENTION_SEPARATOR)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attributes with dotted labels expanded into nested objects.
    ///
    /// `Appearance.Gender = female` becomes `{"Appearance": {"Gender": "female"}}`.
    /// A nested group replaces a flat value stored under the same key.
    pub fn nested_attributes(&self) -> Value {
        let mut root = Map::new();

        for (label, value) in &self.attributes {
            let mut path: Vec<&str> = label.split(ATTRIBUTE_PATH_SEPARATOR).collect();
            let leaf = path.pop().unwrap_or(label.as_str());
            insert_nested(&mut root, &path, leaf, value);
        }

        Value::Object(root)
    }
}

fn insert_nested(node: &mut Map<String, Value>, path: &[&str], leaf: &str, value: &str) {
    let Some((group, rest)) = path.split_first() else {
        node.insert(leaf.to_string(), Value::String(value.to_string()));
        return;
    };

    let slot = node
        .entry(group.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Some(child) = slot.as_object_mut() {
        insert_nested(child, rest, leaf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_prefers_name_attribute() {
        let entity = EntityRecord::new("Elon Musk", "Person").with_attribute("Name", "Elon");
        assert_eq!(entity.display_name(), "Elon");

        let unnamed = EntityRecord::new("a woman", "Person");
        assert_eq!(unnamed.display_name(), "a woman");

        let empty_name = EntityRecord::new("setting", "Scene").with_attribute("Name", "");
        assert_eq!(empty_name.display_name(), "setting");
    }

    #[test]
    fn test_behavior() {
        let entity = EntityRecord::new("Annie", "Person").with_attribute("Behavior", "asking");
        assert_eq!(entity.behavior(), Some("asking"));

        let idle = EntityRecord::new("Annie", "Person").with_attribute("Behavior", "");
        assert_eq!(idle.behavior(), None);
    }

    #[test]
    fn test_mention_list() {
        let entity = EntityRecord::new("setting", "Scene")
            .with_attribute(MENTIONS_KEY, "the setting|| the indoor theme ||");
        assert_eq!(entity.mention_list(), vec!["the setting", "the indoor theme"]);

        assert!(EntityRecord::new("x", "Object").mention_list().is_empty());
    }

    #[test]
    fn test_nested_attributes() {
        let entity = EntityRecord::new("two individuals", "Person")
            .with_attribute("Quantity", "two")
            .with_attribute("Appearance.Clothing", "historical-style costumes")
            .with_attribute("Appearance.Posture", "seated");

        assert_eq!(
            entity.nested_attributes(),
            json!({
                "Quantity": "two",
                "Appearance": {
                    "Clothing": "historical-style costumes",
                    "Posture": "seated"
                }
            })
        );
    }

    #[test]
    fn test_nested_group_replaces_flat_value() {
        let entity = EntityRecord::new("x", "Object")
            .with_attribute("Appearance", "plain")
            .with_attribute("Appearance.Color", "red");

        assert_eq!(
            entity.nested_attributes(),
            json!({ "Appearance": { "Color": "red" } })
        );
    }

    #[test]
    fn test_nested_attributes_several_levels() {
        let entity = EntityRecord::new("car", "Object")
            .with_attribute("Appearance.Paint.Color", "red")
            .with_attribute("Appearance.Paint.Finish", "matte")
            .with_attribute("Appearance.Size", "small");

        assert_eq!(
            entity.nested_attributes(),
            json!({
                "Appearance": {
                    "Paint": { "Color": "red", "Finish": "matte" },
                    "Size": "small"
                }
            })
        );
    }
}
