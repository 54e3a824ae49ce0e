//! Code tables - bijective mappings between domain labels and short codes.
//!
//! Codes are assigned in declaration order: single letters first, then
//! two-letter combinations (`a..z`, `aa..az`, `ba..`). Because some codes
//! are prefixes of others, resolving code text back to a label must use a
//! longest-match scan ([`CodeTable::longest_code_before`]).

mod labels;

pub use labels::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::error::{Result, SchemaError};

/// Number of letters available per code position.
const ALPHABET_LEN: usize = 26;

/// Largest number of labels a single table can hold (`a..z` plus `aa..zz`).
pub const MAX_TABLE_LABELS: usize = ALPHABET_LEN + ALPHABET_LEN * ALPHABET_LEN;

/// The three kinds of tables used by the STTL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Entity type labels (`Person`, `Scene`, ...), coded in uppercase.
    EntityType,
    /// Attribute names, including flattened nested ones (`Appearance.Gender`).
    Attribute,
    /// Relation names (`LocatedAt`, `Performs`, ...).
    Relation,
}

impl TableKind {
    /// Whether codes of this table are written in uppercase.
    pub fn uppercase(&self) -> bool {
        matches!(self, TableKind::EntityType)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::EntityType => "entity type",
            TableKind::Attribute => "attribute",
            TableKind::Relation => "relation",
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compute the code for the label at `index` in declaration order.
///
/// Returns `None` once the two-letter code space is exhausted.
pub fn code_for_index(index: usize, uppercase: bool) -> Option<String> {
    let base = if uppercase { b'A' } else { b'a' };
    let letter = |n: usize| (base + n as u8) as char;

    if index < ALPHABET_LEN {
        Some(letter(index).to_string())
    } else if index < MAX_TABLE_LABELS {
        let rest = index - ALPHABET_LEN;
        let mut code = String::with_capacity(2);
        code.push(letter(rest / ALPHABET_LEN));
        code.push(letter(rest % ALPHABET_LEN));
        Some(code)
    } else {
        None
    }
}

/// An immutable label <-> code registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    kind: TableKind,

    /// Labels in declaration order.
    labels: Vec<String>,

    label_to_code: HashMap<String, String>,
    code_to_label: HashMap<String, String>,

    /// Every code, longest first; ties broken lexically for determinism.
    codes_longest_first: Vec<String>,
}

impl CodeTable {
    /// Build a table from labels in declaration order.
    ///
    /// Fails on an empty list, a repeated label, or more labels than the
    /// two-letter code space can hold.
    pub fn from_labels<I, S>(kind: TableKind, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        if labels.is_empty() {
            return Err(SchemaError::EmptyTable(kind));
        }
        if labels.len() > MAX_TABLE_LABELS {
            return Err(SchemaError::CodeSpaceExhausted {
                kind,
                count: labels.len(),
                max: MAX_TABLE_LABELS,
            });
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(SchemaError::DuplicateLabel {
                    kind,
                    label: label.clone(),
                });
            }
        }

        Ok(Self::assign(kind, labels))
    }

    /// Assign codes to already-validated labels.
    fn assign(kind: TableKind, labels: Vec<String>) -> Self {
        let mut label_to_code = HashMap::with_capacity(labels.len());
        let mut code_to_label = HashMap::with_capacity(labels.len());

        for (index, label) in labels.iter().enumerate() {
            let Some(code) = code_for_index(index, kind.uppercase()) else {
                break;
            };
            label_to_code.insert(label.clone(), code.clone());
            code_to_label.insert(code, label.clone());
        }

        let mut codes_longest_first: Vec<String> = code_to_label.keys().cloned().collect();
        codes_longest_first.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            kind,
            labels,
            label_to_code,
            code_to_label,
            codes_longest_first,
        }
    }

    /// Which kind of table this is.
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Look up the code for a label.
    pub fn code_of(&self, label: &str) -> Option<&str> {
        self.label_to_code.get(label).map(String::as_str)
    }

    /// Look up the label for a code.
    pub fn label_of(&self, code: &str) -> Option<&str> {
        self.code_to_label.get(code).map(String::as_str)
    }

    /// Find the longest code that `text` starts with and that is immediately
    /// followed by `delimiter`.
    ///
    /// A shorter code only wins when no longer code fits, so `aa=` resolves
    /// to `aa` and never to `a` followed by stray text.
    pub fn longest_code_before(&self, text: &str, delimiter: char) -> Option<&str> {
        self.codes_longest_first
            .iter()
            .map(String::as_str)
            .find(|&code| {
                text.strip_prefix(code)
                    .is_some_and(|rest| rest.starts_with(delimiter))
            })
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// `(label, code)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .filter_map(move |label| self.code_of(label).map(|code| (label.as_str(), code)))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The three tables an STTL document is written against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTables {
    pub entity_types: CodeTable,
    pub attributes: CodeTable,
    pub relations: CodeTable,
}

impl CodeTables {
    /// The built-in tables, constructed once on first use.
    pub fn builtin() -> &'static CodeTables {
        static BUILTIN: OnceLock<CodeTables> = OnceLock::new();
        BUILTIN.get_or_init(|| CodeTables {
            entity_types: CodeTable::assign(TableKind::EntityType, owned(ENTITY_TYPE_LABELS)),
            attributes: CodeTable::assign(TableKind::Attribute, owned(ATTRIBUTE_LABELS)),
            relations: CodeTable::assign(TableKind::Relation, owned(RELATION_LABELS)),
        })
    }

    /// Build tables from explicit label lists, each in declaration order.
    pub fn from_label_lists<S: Into<String>>(
        entity_types: impl IntoIterator<Item = S>,
        attributes: impl IntoIterator<Item = S>,
        relations: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        Ok(Self {
            entity_types: CodeTable::from_labels(TableKind::EntityType, entity_types)?,
            attributes: CodeTable::from_labels(TableKind::Attribute, attributes)?,
            relations: CodeTable::from_labels(TableKind::Relation, relations)?,
        })
    }

    /// Get the table of a given kind.
    pub fn table(&self, kind: TableKind) -> &CodeTable {
        match kind {
            TableKind::EntityType => &self.entity_types,
            TableKind::Attribute => &self.attributes,
            TableKind::Relation => &self.relations,
        }
    }
}

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_for_index() {
        assert_eq!(code_for_index(0, false).as_deref(), Some("a"));
        assert_eq!(code_for_index(25, false).as_deref(), Some("z"));
        assert_eq!(code_for_index(26, false).as_deref(), Some("aa"));
        assert_eq!(code_for_index(51, false).as_deref(), Some("az"));
        assert_eq!(code_for_index(52, false).as_deref(), Some("ba"));
        assert_eq!(code_for_index(MAX_TABLE_LABELS - 1, false).as_deref(), Some("zz"));
        assert_eq!(code_for_index(MAX_TABLE_LABELS, false), None);
        assert_eq!(code_for_index(16, true).as_deref(), Some("Q"));
    }

    #[test]
    fn test_builtin_table_sizes() {
        let tables = CodeTables::builtin();
        assert_eq!(tables.entity_types.len(), 17);
        assert_eq!(tables.attributes.len(), 54);
        assert_eq!(tables.relations.len(), 28);
    }

    #[test]
    fn test_builtin_round_trip() {
        let tables = CodeTables::builtin();
        for kind in [TableKind::EntityType, TableKind::Attribute, TableKind::Relation] {
            let table = tables.table(kind);
            for label in table.labels() {
                let code = table.code_of(label).unwrap();
                assert_eq!(table.label_of(code), Some(label), "{kind} {label}");
            }
        }
    }

    #[test]
    fn test_builtin_known_codes() {
        let tables = CodeTables::builtin();
        assert_eq!(tables.entity_types.label_of("A"), Some("Person"));
        assert_eq!(tables.entity_types.label_of("Q"), Some("Shot"));
        assert_eq!(tables.attributes.label_of("ai"), Some("Name"));
        assert_eq!(tables.attributes.label_of("l"), Some("Behavior"));
        assert_eq!(tables.attributes.label_of("bb"), Some("Weather"));
        assert_eq!(tables.relations.label_of("n"), Some("LocatedAt"));
        assert_eq!(tables.relations.label_of("ab"), Some("WorksFor"));
        assert_eq!(tables.relations.label_of("t"), Some("Performs"));
        assert_eq!(tables.relations.label_of("zz"), None);
    }

    #[test]
    fn test_longest_code_before() {
        let attrs = &CodeTables::builtin().attributes;
        assert_eq!(attrs.longest_code_before("aa=foo;", '='), Some("aa"));
        assert_eq!(attrs.longest_code_before("a=bar;", '='), Some("a"));
        assert_eq!(attrs.longest_code_before("ai=Elon", '='), Some("ai"));
        assert_eq!(attrs.longest_code_before("zz=x", '='), None);
        assert_eq!(attrs.longest_code_before("a", '='), None);
    }

    #[test]
    fn test_from_labels_rejects_bad_input() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            CodeTable::from_labels(TableKind::Relation, empty),
            Err(SchemaError::EmptyTable(TableKind::Relation))
        ));

        assert!(matches!(
            CodeTable::from_labels(TableKind::Attribute, ["Name", "Role", "Name"]),
            Err(SchemaError::DuplicateLabel { label, .. }) if label == "Name"
        ));

        let too_many: Vec<String> = (0..=MAX_TABLE_LABELS).map(|i| format!("L{i}")).collect();
        assert!(matches!(
            CodeTable::from_labels(TableKind::Attribute, too_many),
            Err(SchemaError::CodeSpaceExhausted { .. })
        ));
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let table = CodeTable::from_labels(TableKind::EntityType, ["Person", "Animal"]).unwrap();
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![("Person", "A"), ("Animal", "B")]);
    }
}
