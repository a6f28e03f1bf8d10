//! Provider chain: ordered chat providers, first usable answer wins.
//!
//! This is a fallback across *different* providers, not a retry: each link is
//! asked exactly once.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, ChatTarget, LlmError};

#[derive(Clone)]
pub struct ChainLink {
    /// Reported to the client as `modelUsed`.
    pub label: &'static str,
    pub client: Arc<dyn ChatModel>,
    pub target: ChatTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainAnswer {
    pub text: String,
    pub model_used: &'static str,
}

pub struct ProviderChain {
    links: Vec<ChainLink>,
}

impl ProviderChain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.links.iter().map(|l| l.label).collect()
    }

    /// Asks each link in turn. Returns the last error when every link fails.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
        json_response: bool,
    ) -> Result<ChainAnswer, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for link in &self.links {
            let request = match &link.target {
                ChatTarget::Agent(id) => ChatRequest::agent(id.clone(), messages.to_vec()),
                ChatTarget::Model(model) => {
                    let request = ChatRequest::model(model.clone(), messages.to_vec())
                        .sampling(temperature, max_tokens);
                    if json_response {
                        request.json()
                    } else {
                        request
                    }
                }
            };

            match link.client.complete(&request).await {
                Ok(text) => {
                    info!(model_used = link.label, "chat provider answered");
                    return Ok(ChainAnswer {
                        text,
                        model_used: link.label,
                    });
                }
                Err(err) => {
                    warn!(
                        provider = link.client.provider(),
                        label = link.label,
                        error = %err,
                        "chat provider failed, falling back to next"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent {
            provider: "chat provider chain",
        }))
    }
}
