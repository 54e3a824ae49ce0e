//! # STTL Core
//!
//! Decodes STTL text - a terse, line-oriented encoding of a knowledge graph
//! written by a language model - into entities, attributes, and relation
//! triples, and derives a named-entity index from the result.
//!
//! ## Core Components
//!
//! - **knowledge_graph**: Ordered entity arena plus relation triples
//! - **decoder**: Two-mode line parser and the attribute tokenizer
//! - **ner**: Category -> names extraction with pronoun filtering
//!
//! ## Data Flow
//!
//! ```text
//! raw text -> decoder (code tables + attribute tokenizer) -> KnowledgeGraph -> ner -> NerIndex
//! ```
//!
//! Decoding and extraction are total: malformed lines and unknown codes are
//! skipped or replaced by fallbacks, never reported as errors.

pub mod decoder;
pub mod error;
pub mod knowledge_graph;
pub mod ner;
mod ordered;

pub use decoder::*;
pub use error::{GraphError, Result};
pub use knowledge_graph::*;
pub use ner::*;
