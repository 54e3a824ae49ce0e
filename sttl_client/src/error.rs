//! Client error types.

use thiserror::Error;

use sttl_core::GraphError;
use sttl_schema::SchemaError;

/// Errors raised while talking to the model server or handling its output.
///
/// Nothing here is retried automatically; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("request failed with status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("failed to read streamed response: {0}")]
    Stream(#[source] std::io::Error),

    #[error("JSON conversion failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("response contained no completion choices")]
    EmptyResponse,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
