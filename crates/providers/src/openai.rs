//! Chat-completion client for OpenAI-compatible APIs.
//!
//! Sends the prompt as a single user message to `POST {base}/chat/completions`
//! and returns the first choice's content.

use std::time::Duration;

use async_trait::async_trait;
use docent_core::recommendation::{CompletionError, CompletionModel, CompletionRequest};
use serde::{Deserialize, Serialize};

/// HTTP request timeout for a single completion call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Completion API configuration loaded from environment variables.
///
/// | Env Var           | Default                     |
/// |-------------------|-----------------------------|
/// | `OPENAI_API_KEY`  | (none -- disables the LLM)  |
/// | `OPENAI_MODEL`    | `gpt-4o-mini`               |
/// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    /// Returns `None` when `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Completion API returned no content")]
    NoContent,
}

impl From<OpenAiError> for CompletionError {
    fn from(e: OpenAiError) -> Self {
        match e {
            OpenAiError::NoContent => CompletionError::EmptyReply,
            other => CompletionError::Request(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<String, OpenAiError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed.into_content().ok_or(OpenAiError::NoContent)
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let started = std::time::Instant::now();
        let result = self.chat(request).await;
        match &result {
            Ok(content) => tracing::debug!(
                model = %self.config.model,
                max_tokens = request.max_tokens,
                reply_len = content.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Completion succeeded"
            ),
            Err(e) => tracing::warn!(
                model = %self.config.model,
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Completion failed"
            ),
        }
        Ok(result?)
    }
}

/// Stand-in used when no API key is configured; every call fails so callers
/// take their fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredModel;

#[async_trait]
impl CompletionModel for UnconfiguredModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured)
    }
}
