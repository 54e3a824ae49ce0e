//! STTL decoder - turns raw model output into a [`KnowledgeGraph`].
//!
//! The decoder is a two-state line scanner:
//! 1. **Entity** (initial): `<name>:<type-code>[|<attr-block>]`
//! 2. **Relation**: `<subject> <relation-code> <object>`, entered once the
//!    `#R` sentinel line is seen; there is no way back
//!
//! Decoding is best-effort and never fails. Fallbacks differ by table:
//! - unknown entity type code -> the entity is kept with type `"Unknown"`
//! - unknown relation code -> the raw code is used as the relation label
//! - unknown attribute code -> the pair is dropped

mod attributes;

pub use attributes::*;

use std::collections::HashMap;

use sttl_schema::CodeTables;

use crate::knowledge_graph::{EntityRecord, KnowledgeGraph, Triple, MENTIONS_KEY};

/// Line that switches the decoder from entities to relations.
pub const RELATION_SENTINEL: &str = "#R";

/// Marks the start of the mentions suffix inside an attribute block.
pub const MENTIONS_MARKER: &str = ";m=";

/// Type label given to entities whose type code is not in the table.
pub const UNKNOWN_ENTITY_TYPE: &str = "Unknown";

/// Separates the entity name from the rest of an entity line.
const NAME_SEPARATOR: char = ':';

/// Separates the type code from the attribute block.
const ATTRIBUTE_BLOCK_SEPARATOR: char = '|';

/// Stands in for spaces inside STTL identifiers.
const SPACE_PLACEHOLDER: char = '_';

/// Options for a single decode call.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Capture the `;m=` suffix of attribute blocks under the `"mentions"` key.
    pub parse_mentions: bool,

    /// Raw STTL identifier -> display name, applied to entity names and triple
    /// ends before the underscore fallback.
    pub name_aliases: HashMap<String, String>,
}

impl DecodeOptions {
    /// Options with mentions parsing switched on or off.
    pub fn with_mentions(parse_mentions: bool) -> Self {
        Self {
            parse_mentions,
            ..Self::default()
        }
    }

    /// Add a display name for a raw identifier.
    pub fn with_alias(mut self, raw: impl Into<String>, display: impl Into<String>) -> Self {
        self.name_aliases.insert(raw.into(), display.into());
        self
    }
}

/// Which section of the document the decoder is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Entity,
    Relation,
}

/// Decodes STTL text against a set of code tables.
#[derive(Debug, Clone)]
pub struct SttlDecoder<'t> {
    tables: &'t CodeTables,
    options: DecodeOptions,
}

impl SttlDecoder<'static> {
    /// Decoder over the built-in tables.
    pub fn builtin(options: DecodeOptions) -> Self {
        Self::new(CodeTables::builtin(), options)
    }
}

impl<'t> SttlDecoder<'t> {
    pub fn new(tables: &'t CodeTables, options: DecodeOptions) -> Self {
        Self { tables, options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode a full document.
    pub fn decode(&self, text: &str) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        let mut mode = Mode::Entity;

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if line == RELATION_SENTINEL {
                tracing::trace!(line = index + 1, "entering relation section");
                mode = Mode::Relation;
                continue;
            }

            match mode {
                Mode::Entity => match self.decode_entity_line(line) {
                    Some(entity) => {
                        if graph.upsert_entity(entity) {
                            tracing::debug!(line = index + 1, "entity redeclared, earlier record replaced");
                        }
                    }
                    None => tracing::debug!(line = index + 1, text = line, "skipping malformed entity line"),
                },
                Mode::Relation => match self.decode_relation_line(line) {
                    Some(triple) => graph.add_triple(triple),
                    None => tracing::debug!(line = index + 1, text = line, "skipping malformed relation line"),
                },
            }
        }

        tracing::debug!(
            entities = graph.entity_count(),
            triples = graph.triple_count(),
            "decoded STTL document"
        );
        graph
    }

    /// Decode one trimmed entity line. Returns `None` when the line has no `:`.
    pub fn decode_entity_line(&self, line: &str) -> Option<EntityRecord> {
        let (raw_name, rest) = line.split_once(NAME_SEPARATOR)?;

        let name = match self.options.name_aliases.get(raw_name.trim()) {
            Some(alias) => alias.clone(),
            None => raw_name.replace(SPACE_PLACEHOLDER, " ").trim().to_string(),
        };

        let (type_code, attr_block) = match rest.split_once(ATTRIBUTE_BLOCK_SEPARATOR) {
            Some((code, block)) => (code.trim(), Some(block)),
            None => (rest.trim(), None),
        };

        let entity_type = match self.tables.entity_types.label_of(type_code) {
            Some(label) => label.to_string(),
            None => {
                tracing::debug!(entity = %name, code = type_code, "unknown entity type code");
                UNKNOWN_ENTITY_TYPE.to_string()
            }
        };

        let mut entity = EntityRecord::new(name, entity_type);
        if let Some(block) = attr_block.filter(|b| !b.is_empty()) {
            self.decode_attribute_block(block, &mut entity);
        }
        Some(entity)
    }

    fn decode_attribute_block(&self, block: &str, entity: &mut EntityRecord) {
        let (block, mentions) = if self.options.parse_mentions {
            split_mentions(block)
        } else {
            (block, None)
        };

        let tokenizer = AttributeTokenizer::new(&self.tables.attributes);
        for (label, value) in tokenizer.tokenize(block) {
            entity.attributes.insert(label.to_string(), value.to_string());
        }

        if let Some(mentions) = mentions.filter(|m| !m.is_empty()) {
            entity
                .attributes
                .insert(MENTIONS_KEY.to_string(), mentions.to_string());
        }
    }

    /// Decode one trimmed relation line. Returns `None` with fewer than three tokens.
    pub fn decode_relation_line(&self, line: &str) -> Option<Triple> {
        let mut tokens = line.split_whitespace();
        let (subject, code, object) = (tokens.next()?, tokens.next()?, tokens.next()?);

        let relation = match self.tables.relations.label_of(code) {
            Some(label) => label,
            None => {
                tracing::debug!(code, "unknown relation code, keeping it verbatim");
                code
            }
        };

        Some(Triple::new(
            self.resolve_identifier(subject),
            relation,
            self.resolve_identifier(object),
        ))
    }

    fn resolve_identifier(&self, raw: &str) -> String {
        self.options
            .name_aliases
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.replace(SPACE_PLACEHOLDER, " "))
    }
}

/// Split the mentions suffix off an attribute block.
///
/// The last `;m=` wins; everything after it is the mentions value and the
/// marker plus value are removed from the block.
pub fn split_mentions(block: &str) -> (&str, Option<&str>) {
    match block.rfind(MENTIONS_MARKER) {
        Some(at) => (&block[..at], Some(&block[at + MENTIONS_MARKER.len()..])),
        None => (block, None),
    }
}

/// Decode with the built-in tables.
pub fn decode(text: &str, parse_mentions: bool) -> KnowledgeGraph {
    SttlDecoder::builtin(DecodeOptions::with_mentions(parse_mentions)).decode(text)
}
