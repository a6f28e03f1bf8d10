/// LLM client: the single point of entry for every hosted-model call in SnapWort.
///
/// ARCHITECTURAL RULE: No other module may talk to a model provider directly.
/// Handlers receive these clients through `AppState` as trait objects, so the
/// upstream can be swapped (or scripted in tests) without touching call sites.
///
/// Providers:
/// - Gemini `generateContent` (`GenerativeModel`)
/// - OpenAI-compatible chat completions: Mistral, OpenAI, Groq (`ChatModel`)
/// - Whisper transcription (`Transcriber`)
///
/// No call is retried. A failed upstream call fails (or degrades) that one request.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chat;
pub mod gemini;
pub mod template;
pub mod whisper;

#[cfg(test)]
pub mod testing;

pub use chat::ChatCompletionsClient;
pub use gemini::GeminiClient;
pub use whisper::WhisperClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Empty response from {provider} API")]
    EmptyContent { provider: &'static str },

    #[error("Invalid response format from {provider} API")]
    InvalidFormat { provider: &'static str },

    #[error("{provider} does not support agent completions")]
    AgentsUnsupported { provider: &'static str },
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini request model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(texts: &[&str]) -> Self {
        Self {
            role: ContentRole::User,
            parts: texts
                .iter()
                .map(|t| Part {
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    pub fn model(text: &str) -> Self {
        Self {
            role: ContentRole::Model,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// One `generateContent` call: which model, what conversation, how to sample.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: &'static str,
    pub contents: Vec<Content>,
    pub config: GenerationConfig,
}

impl GenerateRequest {
    /// Single user turn holding one prompt.
    pub fn prompt(model: &'static str, prompt: &str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            contents: vec![Content::user(&[prompt])],
            config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Chat-completions request model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A chat completion is addressed either to a named model or to a
/// pre-configured agent (Mistral only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    Model(String),
    Agent(String),
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub target: ChatTarget,
    pub messages: Vec<ChatMessage>,
    /// Agents ignore sampling parameters.
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider to force a JSON object response.
    pub json_response: bool,
}

impl ChatRequest {
    pub fn model(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            target: ChatTarget::Model(model.into()),
            messages,
            temperature: None,
            max_tokens: None,
            json_response: false,
        }
    }

    pub fn agent(agent_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            target: ChatTarget::Agent(agent_id.into()),
            messages,
            temperature: None,
            max_tokens: None,
            json_response: false,
        }
    }

    pub fn sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// An uploaded audio file bound for transcription.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider traits
// ────────────────────────────────────────────────────────────────────────────

/// Gemini-style generation: role-tagged content parts in, completion text out.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError>;
}

/// OpenAI-compatible chat completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Display name used in error messages ("Mistral", "OpenAI", ...).
    fn provider(&self) -> &'static str;

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Shared plumbing
// ────────────────────────────────────────────────────────────────────────────

/// Builds the outbound HTTP client shared by every provider.
pub fn http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Reads a non-success response body. JSON payloads are kept verbatim so the
/// provider's own error description reaches the caller.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => value.to_string(),
        Err(_) => body,
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
