//! Knowledge Graph - the decoded entities and triples of one STTL document.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use super::{EntityRecord, Triple};
use crate::error::Result;
use crate::ordered::OrderedEntries;

/// The decoded graph.
///
/// Entities live in an append-only arena in declaration order and are
/// indexed by name. Re-declaring a name replaces the record in its original
/// slot, so iteration order is always first-declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KnowledgeGraph {
    /// Relation triples in decode order. Duplicates are kept.
    triples: Vec<Triple>,

    /// Entity arena in declaration order.
    entities: Vec<EntityRecord>,

    /// Index: entity name -> slot in `entities`.
    by_name: HashMap<String, usize>,
}

impl KnowledgeGraph {
    /// Create a new empty knowledge graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entity, replacing any earlier record with the same name.
    ///
    /// Returns `true` when an earlier record was replaced.
    pub fn upsert_entity(&mut self, entity: EntityRecord) -> bool {
        match self.by_name.get(&entity.name) {
            Some(&slot) => {
                self.entities[slot] = entity;
                true
            }
            None => {
                self.by_name.insert(entity.name.clone(), self.entities.len());
                self.entities.push(entity);
                false
            }
        }
    }

    /// Append a triple.
    pub fn add_triple(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// Get an entity by name.
    pub fn entity(&self, name: &str) -> Option<&EntityRecord> {
        self.by_name.get(name).map(|&slot| &self.entities[slot])
    }

    /// Get the type label of an entity.
    pub fn entity_type(&self, name: &str) -> Option<&str> {
        self.entity(name).map(|e| e.entity_type.as_str())
    }

    /// Get the attributes of an entity.
    pub fn attributes(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.entity(name).map(|e| &e.attributes)
    }

    /// Check if an entity was declared.
    pub fn has_entity(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All entities in declaration order.
    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// Entities of a given type, in declaration order.
    pub fn entities_of_type<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a EntityRecord> + 'a {
        self.entities
            .iter()
            .filter(move |e| e.entity_type == entity_type)
    }

    /// All triples in decode order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Triples whose subject is `subject`.
    pub fn triples_from<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| t.subject == subject)
    }

    /// Triples that mention `entity` as subject or object.
    pub fn triples_involving<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| t.involves(entity))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.triples.is_empty()
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a graph from its JSON document form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `Entity_types` view: name -> type label, in declaration order.
struct EntityTypesView<'a>(&'a [EntityRecord]);

impl Serialize for EntityTypesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|e| (&e.name, &e.entity_type)))
    }
}

/// `Attributes` view: name -> attribute map, in declaration order.
struct AttributesView<'a>(&'a [EntityRecord]);

impl Serialize for AttributesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|e| (&e.name, &e.attributes)))
    }
}

impl Serialize for KnowledgeGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("KnowledgeGraph", 3)?;
        state.serialize_field("Triples", &self.triples)?;
        state.serialize_field("Entity_types", &EntityTypesView(&self.entities))?;
        state.serialize_field("Attributes", &AttributesView(&self.entities))?;
        state.end()
    }
}

/// The document form of a graph.
#[derive(Deserialize)]
struct GraphDocument {
    #[serde(rename = "Triples", default)]
    triples: Vec<Triple>,

    #[serde(rename = "Entity_types", default)]
    entity_types: OrderedEntries<String>,

    #[serde(rename = "Attributes", default)]
    attributes: HashMap<String, BTreeMap<String, String>>,
}

impl<'de> Deserialize<'de> for KnowledgeGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let GraphDocument {
            triples,
            entity_types,
            mut attributes,
        } = GraphDocument::deserialize(deserializer)?;

        let mut graph = KnowledgeGraph::new();
        for (name, entity_type) in entity_types.0 {
            let attrs = attributes.remove(&name).unwrap_or_default();
            graph.upsert_entity(EntityRecord {
                name,
                entity_type,
                attributes: attrs,
            });
        }
        for orphan in attributes.keys() {
            tracing::debug!(entity = %orphan, "dropping attributes of undeclared entity");
        }
        graph.triples = triples;

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_entity(
            EntityRecord::new("a woman", "Person").with_attribute("Behavior", "walking"),
        );
        graph.upsert_entity(EntityRecord::new("a moving train carriage", "Object"));
        graph.upsert_entity(EntityRecord::new("platform 13", "Scene"));
        graph.add_triple(Triple::new("a woman", "InteractWith", "a moving train carriage"));
        graph.add_triple(Triple::new("a moving train carriage", "LocatedAt", "platform 13"));
        graph
    }

    #[test]
    fn test_upsert_and_lookup() {
        let graph = sample_graph();

        assert_eq!(graph.entity_count(), 3);
        assert_eq!(graph.entity_type("a woman"), Some("Person"));
        assert_eq!(
            graph.attributes("a woman").unwrap().get("Behavior").map(String::as_str),
            Some("walking")
        );
        assert!(graph.has_entity("platform 13"));
        assert!(!graph.has_entity("nobody"));
    }

    #[test]
    fn test_redeclaration_overwrites_in_place() {
        let mut graph = sample_graph();

        let replaced = graph.upsert_entity(EntityRecord::new("a woman", "Unknown"));
        assert!(replaced);
        assert_eq!(graph.entity_count(), 3);
        assert_eq!(graph.entity_type("a woman"), Some("Unknown"));
        assert!(graph.attributes("a woman").unwrap().is_empty());
        // Still first in declaration order
        assert_eq!(graph.entities()[0].name, "a woman");
    }

    #[test]
    fn test_triple_queries() {
        let mut graph = sample_graph();
        graph.add_triple(Triple::new("a woman", "InteractWith", "a moving train carriage"));

        assert_eq!(graph.triple_count(), 3);
        assert_eq!(graph.triples_from("a woman").count(), 2);
        assert_eq!(graph.triples_involving("a moving train carriage").count(), 3);
        assert_eq!(graph.entities_of_type("Scene").count(), 1);
    }

    #[test]
    fn test_json_field_names_and_order() {
        let graph = sample_graph();
        let json = graph.to_json().unwrap();

        assert!(json.starts_with(r#"{"Triples":[["a woman","InteractWith","a moving train carriage"]"#));
        assert!(json.contains(
            r#""Entity_types":{"a woman":"Person","a moving train carriage":"Object","platform 13":"Scene"}"#
        ));
        assert!(json.contains(r#""Attributes":{"a woman":{"Behavior":"walking"},"#));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let graph = sample_graph();
        let restored = KnowledgeGraph::from_json(&graph.to_json_pretty().unwrap()).unwrap();

        assert_eq!(restored, graph);
        let names: Vec<_> = restored.entities().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a woman", "a moving train carriage", "platform 13"]);
    }

    #[test]
    fn test_from_json_tolerates_missing_sections() {
        let graph = KnowledgeGraph::from_json(r#"{"Entity_types":{"Acme":"Organization"}}"#).unwrap();
        assert_eq!(graph.entity_type("Acme"), Some("Organization"));
        assert!(graph.attributes("Acme").unwrap().is_empty());
        assert_eq!(graph.triple_count(), 0);
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        assert!(KnowledgeGraph::from_json(r#"{"Triples":[["only","two"]]}"#).is_err());
        assert!(KnowledgeGraph::from_json("not json").is_err());
    }
}
