//! Chat-completions client for the text generation endpoint.
//!
//! The core treats generation as one opaque transformation: role-tagged
//! messages in, free-form text out. The production client speaks the
//! OpenAI-style `/chat/completions` contract.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::SummarizeError;

/// One role-tagged message in a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Text-generation abstraction (allows mocking for tests).
pub trait LlmClient: Send + Sync {
    /// Submit messages, return the assistant's text content.
    fn chat(&self, messages: &[ChatMessage]) -> Result<String, SummarizeError>;
}

/// Request body for /chat/completions.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Response body from /chat/completions.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsClient {
    endpoint: String,
    model: String,
    api_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl ChatCompletionsClient {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, SummarizeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SummarizeError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token,
            client,
        })
    }
}

impl LlmClient for ChatCompletionsClient {
    fn chat(&self, messages: &[ChatMessage]) -> Result<String, SummarizeError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                SummarizeError::Connection(self.endpoint.clone())
            } else {
                SummarizeError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummarizeError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| SummarizeError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SummarizeError::ResponseParsing("response had no choices".into()))
    }
}

/// Mock LLM client for tests — pops one scripted response per call and
/// counts how many calls were made.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of chat calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn chat(&self, _messages: &[ChatMessage]) -> Result<String, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .ok_or_else(|| SummarizeError::ResponseParsing("mock script exhausted".into()))
    }
}
