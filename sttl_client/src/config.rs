//! Client configuration.
//!
//! Loaded from TOML with every field optional, then optionally overridden
//! from the environment (`STTL_HOST`, `STTL_PORT`, `STTL_TIMEOUT_SECS`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Path of the llama.cpp-style completion endpoint.
pub const COMPLETION_PATH: &str = "/completion";

/// Path of the OpenAI-style chat endpoint.
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// One LoRA adapter and the scale to apply it with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoraAdapter {
    pub id: u32,
    pub scale: f64,
}

impl LoraAdapter {
    pub fn new(id: u32, scale: f64) -> Self {
        Self { id, scale }
    }
}

/// Which server API to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Raw prompt completion with sampling parameters and LoRA scales.
    #[default]
    Completion,
    /// Chat messages; the answer is the first choice's message content.
    Chat,
}

/// Settings for reaching the model server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub endpoint: Endpoint,

    /// Upper bound for a whole request, including reading a streamed body.
    pub timeout_secs: u64,

    pub temperature: f64,

    /// Nucleus-sampling probability.
    pub top_p: f64,

    /// Ask the server to stream the completion as server-sent events.
    pub stream: bool,

    pub lora: Vec<LoraAdapter>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            endpoint: Endpoint::Completion,
            timeout_secs: 30,
            temperature: 0.9,
            top_p: 0.6,
            stream: true,
            lora: vec![LoraAdapter::new(0, 1.0), LoraAdapter::new(1, 0.0)],
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `STTL_HOST`, `STTL_PORT`, and `STTL_TIMEOUT_SECS` when set.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("STTL_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("STTL_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid STTL_PORT"),
            }
        }
        if let Some(timeout) = lookup("STTL_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %timeout, "ignoring invalid STTL_TIMEOUT_SECS"),
            }
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Full URL of the configured endpoint.
    pub fn url(&self) -> String {
        let path = match self.endpoint {
            Endpoint::Completion => COMPLETION_PATH,
            Endpoint::Chat => CHAT_COMPLETIONS_PATH,
        };
        format!("{}{}", self.base_url(), path)
    }
}
