use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error_body, join_url, ChatMessage, ChatModel, ChatRequest, ChatTarget, LlmError};

pub const MISTRAL_SMALL: &str = "mistral-small";
pub const MISTRAL_SMALL_LATEST: &str = "mistral-small-latest";
pub const OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";
pub const GROQ_CHAT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct AgentCompletionBody<'a> {
    agent_id: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<MessageContent>,
}

/// Providers return either a plain string or a list of typed chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Chunks(Vec<ContentChunk>),
}

#[derive(Debug, Deserialize)]
struct ContentChunk {
    text: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self, provider: &'static str) -> Result<String, LlmError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent { provider })?;

        let text = match content {
            MessageContent::Text(text) => text,
            MessageContent::Chunks(chunks) => chunks.into_iter().filter_map(|c| c.text).collect(),
        };

        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent { provider });
        }
        Ok(text)
    }
}

/// Client for any OpenAI-compatible `/v1/chat/completions` endpoint.
/// Mistral additionally exposes `/v1/agents/completions`.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    provider: &'static str,
    supports_agents: bool,
}

impl ChatCompletionsClient {
    pub fn mistral(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            provider: "Mistral",
            supports_agents: true,
        }
    }

    pub fn openai(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            provider: "OpenAI",
            supports_agents: false,
        }
    }

    pub fn groq(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            provider: "Groq",
            supports_agents: false,
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let response = self
            .client
            .post(join_url(&self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api {
                provider: self.provider,
                status: status.as_u16(),
                message: error_body(response).await,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatModel for ChatCompletionsClient {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response = match &request.target {
            ChatTarget::Model(model) => {
                let body = ChatCompletionBody {
                    model,
                    messages: &request.messages,
                    temperature: request.temperature,
                    max_tokens: request.max_tokens,
                    response_format: request.json_response.then_some(ResponseFormat {
                        kind: "json_object",
                    }),
                };
                self.post("v1/chat/completions", &body).await?
            }
            ChatTarget::Agent(agent_id) => {
                if !self.supports_agents {
                    return Err(LlmError::AgentsUnsupported {
                        provider: self.provider,
                    });
                }
                let body = AgentCompletionBody {
                    agent_id,
                    messages: &request.messages,
                };
                self.post("v1/agents/completions", &body).await?
            }
        };

        debug!(provider = self.provider, "chat completion received");
        response.into_text(self.provider)
    }
}
