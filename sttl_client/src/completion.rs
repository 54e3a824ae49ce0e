//! Completion client - issues one request per call to the model server.

use serde::{Deserialize, Serialize};
use std::io::BufReader;

use crate::config::{ClientConfig, Endpoint, LoraAdapter};
use crate::error::{ClientError, Result};
use crate::prompt;
use crate::stream::aggregate_stream;

/// Anything that can turn a prompt into model output.
pub trait CompletionBackend {
    /// Run a single completion and return the full text.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Build the prompt asking for an STTL encoding of `text`.
    fn extraction_prompt(&self, text: &str) -> String {
        prompt::extraction_prompt(text)
    }

    /// Build the prompt asking for quick-search labels for `text`.
    fn label_prompt(&self, text: &str) -> String {
        prompt::label_prompt(text)
    }
}

/// Body of a `/completion` request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub stream: bool,
    pub temperature: f64,
    pub top_p: f64,
    pub lora: &'a [LoraAdapter],
}

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a chat completions request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Blocking HTTP client for the model server.
///
/// Every request is bounded by the configured timeout, which also covers
/// reading a streamed body. Failures are returned to the caller, never retried.
pub struct CompletionClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl CompletionClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self { config, agent }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request body for the completion endpoint.
    pub fn completion_request<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            prompt,
            stream: self.config.stream,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            lora: &self.config.lora,
        }
    }

    fn post(&self, url: &str, body: impl Serialize) -> Result<ureq::Response> {
        tracing::info!(url, "sending completion request");

        match self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_json(body)
        {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                tracing::warn!(url, code, "model server returned an error status");
                Err(ClientError::Status { code, body })
            }
            Err(err) => Err(ClientError::Transport {
                url: url.to_string(),
                source: Box::new(err),
            }),
        }
    }

    /// Raw prompt completion; streamed bodies are aggregated into one string.
    pub fn completion(&self, prompt: &str) -> Result<String> {
        let url = self.config.url();
        let response = self.post(&url, self.completion_request(prompt))?;

        let text = if self.config.stream {
            aggregate_stream(BufReader::new(response.into_reader()))?
        } else {
            response.into_string()?
        };

        tracing::info!(url = %url, bytes = text.len(), "completion finished");
        Ok(text)
    }

    /// Chat completion with a single user message.
    pub fn chat(&self, message: &str) -> Result<String> {
        let url = self.config.url();
        let request = ChatRequest {
            messages: vec![ChatMessage::user(message)],
        };
        let response: ChatResponse = self.post(&url, request)?.into_json()?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ClientError::EmptyResponse)?;

        tracing::info!(url = %url, bytes = content.len(), "chat completion finished");
        Ok(content)
    }
}

impl CompletionBackend for CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        match self.config.endpoint {
            Endpoint::Completion => self.completion(prompt),
            Endpoint::Chat => self.chat(prompt),
        }
    }

    fn extraction_prompt(&self, text: &str) -> String {
        match self.config.endpoint {
            Endpoint::Completion => prompt::extraction_prompt(text),
            // The server applies its own chat template
            Endpoint::Chat => prompt::extraction_message(text),
        }
    }

    fn label_prompt(&self, text: &str) -> String {
        match self.config.endpoint {
            Endpoint::Completion => prompt::label_prompt(text),
            Endpoint::Chat => prompt::label_message(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_request_body() {
        let client = CompletionClient::new(ClientConfig::default());
        let body = serde_json::to_value(client.completion_request("hello")).unwrap();

        assert_eq!(
            body,
            json!({
                "prompt": "hello",
                "stream": true,
                "temperature": 0.9,
                "top_p": 0.6,
                "lora": [{"id": 0, "scale": 1.0}, {"id": 1, "scale": 0.0}]
            })
        );
    }

    #[test]
    fn test_chat_request_body() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("extract labels")],
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"messages": [{"role": "user", "content": "extract labels"}]})
        );
    }

    #[test]
    fn test_chat_response_parsing() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Elon Musk"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.choices[0].message.content, "Elon Musk");

        let empty: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn test_extraction_prompt_depends_on_endpoint() {
        let completion = CompletionClient::new(ClientConfig::default());
        assert!(completion.extraction_prompt("text").starts_with("<|im_start|>user\n"));

        let chat = CompletionClient::new(ClientConfig {
            endpoint: Endpoint::Chat,
            ..ClientConfig::default()
        });
        assert_eq!(
            chat.extraction_prompt("text"),
            format!("{}\ntext", prompt::EXTRACTION_INSTRUCTION)
        );
        assert_eq!(
            chat.label_prompt("text"),
            format!("{}\ntext", prompt::LABEL_INSTRUCTION)
        );
    }
}
