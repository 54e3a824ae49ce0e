//! Stream aggregator - reassembles a server-sent-event completion stream.
//!
//! Each event line of interest looks like `data: {"content": "...", "stop": false}`.
//! Blank lines, keep-alives, other fields, and unparseable payloads are skipped.
//! Reading ends on a `stop: true` chunk, the `[DONE]` sentinel, or end of stream.

use serde::Deserialize;
use std::io::BufRead;

use crate::error::{ClientError, Result};

/// Prefix of lines carrying a JSON payload.
pub const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One streamed fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct StreamChunk {
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub stop: bool,
}

/// Parse a single event line. Returns `None` for lines that carry no chunk.
pub fn parse_event_line(line: &str) -> Option<StreamChunk> {
    let data = line.strip_prefix(DATA_PREFIX)?;
    if data.is_empty() || data == DONE_SENTINEL {
        return None;
    }

    match serde_json::from_str(data) {
        Ok(chunk) => Some(chunk),
        Err(err) => {
            tracing::debug!(%err, "skipping unparseable stream payload");
            None
        }
    }
}

/// Concatenate the `content` of every chunk until the stream stops.
///
/// Blocks on `reader` until a stop signal or end of stream; an I/O error
/// from the reader is returned as [`ClientError::Stream`].
pub fn aggregate_stream<R: BufRead>(reader: R) -> Result<String> {
    let mut text = String::new();
    let mut chunks = 0usize;

    for line in reader.lines() {
        let line = line.map_err(ClientError::Stream)?;

        if line.strip_prefix(DATA_PREFIX) == Some(DONE_SENTINEL) {
            break;
        }

        let Some(chunk) = parse_event_line(&line) else {
            continue;
        };
        chunks += 1;
        text.push_str(&chunk.content);

        if chunk.stop {
            break;
        }
    }

    tracing::debug!(chunks, bytes = text.len(), "aggregated completion stream");
    Ok(text)
}
