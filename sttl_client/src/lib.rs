//! # STTL Client
//!
//! The plumbing around the decoder: asking a model server for an STTL
//! encoding of some text, reassembling the streamed answer, and handing the
//! finished string to [`sttl_core`].
//!
//! ## Core Components
//!
//! - **completion**: Blocking HTTP client for completion and chat endpoints
//! - **stream**: Server-sent-event aggregation into one string
//! - **prompt**: Prompt templates for extraction and search labels
//! - **config**: TOML/env client configuration

pub mod completion;
pub mod config;
pub mod error;
pub mod prompt;
pub mod stream;

pub use completion::*;
pub use config::*;
pub use error::{ClientError, Result};
pub use stream::*;

use serde::Serialize;

use sttl_core::{extract, DecodeOptions, KnowledgeGraph, NerIndex, SttlDecoder};
use sttl_schema::CodeTables;

/// The outcome of running text through the model, decoder, and extractor.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// STTL text exactly as the model produced it.
    pub sttl: String,
    pub graph: KnowledgeGraph,
    pub ner: NerIndex,
}

impl Extraction {
    /// Decode and index already-available STTL text.
    pub fn from_sttl(sttl: String, tables: &CodeTables, options: DecodeOptions) -> Self {
        let graph = SttlDecoder::new(tables, options).decode(&sttl);
        let ner = extract(&graph);
        Self { sttl, graph, ner }
    }
}

/// Ask the backend for an STTL encoding of `text`, then decode and index it.
pub fn run_extraction(
    backend: &dyn CompletionBackend,
    text: &str,
    tables: &CodeTables,
    options: DecodeOptions,
) -> Result<Extraction> {
    let prompt = backend.extraction_prompt(text);
    let sttl = backend.complete(&prompt)?;
    Ok(Extraction::from_sttl(sttl, tables, options))
}

/// Quick-search labels the model produced for `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub labels: String,
}

/// Ask the backend for quick-search labels for `text`.
///
/// The answer is returned as the model wrote it, with surrounding whitespace
/// trimmed.
pub fn run_labelling(backend: &dyn CompletionBackend, text: &str) -> Result<Labels> {
    let prompt = backend.label_prompt(text);
    let answer = backend.complete(&prompt)?;
    Ok(Labels {
        labels: answer.trim().to_string(),
    })
}
