//! Relation triples - edges in the knowledge graph.

use serde::{Deserialize, Serialize};

/// A `(subject, relation, object)` statement.
///
/// Serialized as a three-element string array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[String; 3]", into = "[String; 3]")]
pub struct Triple {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }

    /// Check whether the entity appears on either end of this triple.
    pub fn involves(&self, entity: &str) -> bool {
        self.subject == entity || self.object == entity
    }
}

impl From<[String; 3]> for Triple {
    fn from([subject, relation, object]: [String; 3]) -> Self {
        Self {
            subject,
            relation,
            object,
        }
    }
}

impl From<Triple> for [String; 3] {
    fn from(triple: Triple) -> Self {
        [triple.subject, triple.relation, triple.object]
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.relation, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_serializes_as_array() {
        let triple = Triple::new("Elon Musk", "Performs", "talking");
        let json = serde_json::to_string(&triple).unwrap();
        assert_eq!(json, r#"["Elon Musk","Performs","talking"]"#);

        let back: Triple = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triple);
    }

    #[test]
    fn test_triple_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Triple>(r#"["a","b"]"#).is_err());
    }

    #[test]
    fn test_involves() {
        let triple = Triple::new("a woman", "InteractWith", "a train");
        assert!(triple.involves("a woman"));
        assert!(triple.involves("a train"));
        assert!(!triple.involves("InteractWith"));
    }
}
