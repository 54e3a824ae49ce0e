//! Named-entity extraction over a decoded graph.
//!
//! Entities are visited in declaration order:
//! 1. **Display name**: the `Name` attribute when non-empty, else the entity name
//! 2. **Person**: pronouns are discarded; otherwise the display name goes to
//!    `"Name"` and a non-empty `Behavior` goes to `"Behavior"`
//! 3. **Everything else**: the display name goes to the entity's type label
//!
//! Each category keeps the first occurrence of a value and skips repeats.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use sttl_schema::PERSON;

use crate::error::Result;
use crate::knowledge_graph::{EntityRecord, KnowledgeGraph};
use crate::ordered::OrderedEntries;

/// Category receiving person display names.
pub const NAME_CATEGORY: &str = "Name";

/// Category receiving person behaviors.
pub const BEHAVIOR_CATEGORY: &str = "Behavior";

/// Person display names that are discarded, compared case-insensitively.
pub const PRONOUNS: &[&str] = &["i", "we", "he", "she", "her", "me", "them", "they", "you"];

/// Check whether a display name is one of the filtered pronouns.
pub fn is_pronoun(name: &str) -> bool {
    PRONOUNS.iter().any(|p| p.eq_ignore_ascii_case(name))
}

/// Category -> unique names, both in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NerIndex {
    categories: Vec<(String, Vec<String>)>,
}

impl NerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names recorded under a category.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, values)| values.as_slice())
    }

    /// Check if a category has any names.
    pub fn contains_category(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    /// `(category, names)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of names across all categories.
    pub fn total_names(&self) -> usize {
        self.categories.iter().map(|(_, values)| values.len()).sum()
    }

    /// Append a value to a category. The caller guarantees uniqueness.
    fn push(&mut self, category: &str, value: &str) {
        match self.categories.iter_mut().find(|(name, _)| name == category) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .categories
                .push((category.to_string(), vec![value.to_string()])),
        }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for NerIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for NerIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = OrderedEntries::<Vec<String>>::deserialize(deserializer)?;
        Ok(Self {
            categories: entries.0,
        })
    }
}

/// Builds a [`NerIndex`] with per-category de-duplication.
#[derive(Debug, Default)]
struct IndexBuilder {
    index: NerIndex,
    seen: HashSet<(String, String)>,
}

impl IndexBuilder {
    fn add(&mut self, category: &str, value: &str) {
        if self.seen.insert((category.to_string(), value.to_string())) {
            self.index.push(category, value);
        }
    }

    fn add_entity(&mut self, entity: &EntityRecord) {
        let display_name = entity.display_name();

        if entity.entity_type == PERSON {
            if is_pronoun(display_name) {
                tracing::trace!(entity = %entity.name, "skipping pronoun");
                return;
            }
            self.add(NAME_CATEGORY, display_name);
            if let Some(behavior) = entity.behavior() {
                self.add(BEHAVIOR_CATEGORY, behavior);
            }
        } else {
            self.add(&entity.entity_type, display_name);
        }
    }
}

/// Extract the named-entity index from a graph.
pub fn extract(graph: &KnowledgeGraph) -> NerIndex {
    let mut builder = IndexBuilder::default();
    for entity in graph.entities() {
        builder.add_entity(entity);
    }
    builder.index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_pronoun_person_is_discarded() {
        let graph = decode("he:A|l=talking\nHER:A\nAnnie:A", false);
        let index = extract(&graph);

        assert_eq!(index.get(NAME_CATEGORY).unwrap(), ["Annie"]);
        assert!(!index.contains_category(BEHAVIOR_CATEGORY));
    }

    #[test]
    fn test_person_without_behavior() {
        let index = extract(&decode("Annie:A", false));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Name").unwrap(), ["Annie"]);
        assert!(index.get("Behavior").is_none());
    }

    #[test]
    fn test_person_with_name_and_behavior() {
        let index = extract(&decode("Elon_Musk:A|ai=Elon Musk;l=says;", false));

        assert_eq!(index.get("Name").unwrap(), ["Elon Musk"]);
        assert_eq!(index.get("Behavior").unwrap(), ["says"]);
    }

    #[test]
    fn test_pronoun_check_uses_display_name() {
        // Entity id is not a pronoun but its Name attribute is
        let index = extract(&decode("speaker_1:A|ai=They;l=laughing", false));
        assert!(index.is_empty());

        // Entity id is a pronoun but the Name attribute is a real name
        let index = extract(&decode("she:A|ai=Annie", false));
        assert_eq!(index.get("Name").unwrap(), ["Annie"]);
    }

    #[test]
    fn test_duplicate_display_names_collapse() {
        let graph = decode("Acme_Inc:C|ai=Acme\nAcme_Corp:C|ai=Acme\nGlobex:C", false);
        let index = extract(&graph);

        assert_eq!(index.get("Organization").unwrap(), ["Acme", "Globex"]);
    }

    #[test]
    fn test_dedup_is_per_category() {
        let graph = decode(
            "Mercury:E|ai=Mercury\nMercury_Planet:P|ai=Mercury\nFreddie:A|ai=Mercury;l=singing\nx:A|l=singing",
            false,
        );
        let index = extract(&graph);

        assert_eq!(index.get("Scene").unwrap(), ["Mercury"]);
        assert_eq!(index.get("Concept").unwrap(), ["Mercury"]);
        assert_eq!(index.get("Name").unwrap(), ["Mercury", "x"]);
        assert_eq!(index.get("Behavior").unwrap(), ["singing"]);
    }

    #[test]
    fn test_categories_follow_first_seen_order() {
        let graph = decode("Rain:L\nAnnie:A|l=asking\nStorm:L\nUnknownThing:ZZ", false);
        let index = extract(&graph);

        let categories: Vec<_> = index.categories().collect();
        assert_eq!(categories, vec!["Sound", "Name", "Behavior", "Unknown"]);
        assert_eq!(index.get("Sound").unwrap(), ["Rain", "Storm"]);
        assert_eq!(index.total_names(), 5);
    }

    #[test]
    fn test_json_output() {
        let index = extract(&decode("Annie:A|l=asking\nAcme:C", false));
        assert_eq!(
            index.to_json().unwrap(),
            r#"{"Name":["Annie"],"Behavior":["asking"],"Organization":["Acme"]}"#
        );

        let back: NerIndex = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        assert_eq!(back, index);
    }

    #[test]
    fn test_is_pronoun() {
        assert!(is_pronoun("I"));
        assert!(is_pronoun("They"));
        assert!(is_pronoun("ME"));
        assert!(!is_pronoun("Annie"));
        assert!(!is_pronoun("hers"));
        assert!(!is_pronoun(" he"));
    }

    #[test]
    fn test_empty_graph() {
        assert!(extract(&KnowledgeGraph::new()).is_empty());
    }
}
