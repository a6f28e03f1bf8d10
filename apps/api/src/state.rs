use std::sync::Arc;

use crate::assistant::chain::{ChainLink, ProviderChain};
use crate::config::Config;
use crate::db::DocumentStore;
use crate::errors::AppError;
use crate::llm_client::chat::MISTRAL_SMALL_LATEST;
use crate::llm_client::{ChatModel, ChatTarget, GenerativeModel, Transcriber};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Each collaborator is built once at startup. A `None` means the matching
/// configuration is absent; handlers that need it answer `NOT_CONFIGURED`
/// before making any outbound call.
#[derive(Clone)]
pub struct AppState {
    pub gemini: Option<Arc<dyn GenerativeModel>>,
    pub mistral: Option<Arc<dyn ChatModel>>,
    /// Extra chat providers tried after Mistral (OpenAI, Groq), in order.
    pub chat_fallbacks: Vec<ChainLink>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub store: Option<Arc<dyn DocumentStore>>,
    pub config: Config,
}

impl AppState {
    pub fn gemini(&self) -> Result<&dyn GenerativeModel, AppError> {
        self.gemini.as_deref().ok_or(AppError::NotConfigured {
            service: "Google",
            var: "GOOGLE_API_KEY",
        })
    }

    pub fn mistral(&self) -> Result<&dyn ChatModel, AppError> {
        self.mistral.as_deref().ok_or(AppError::NotConfigured {
            service: "Mistral",
            var: "MISTRAL_API_KEY",
        })
    }

    pub fn transcriber(&self) -> Result<&dyn Transcriber, AppError> {
        self.transcriber.as_deref().ok_or(AppError::NotConfigured {
            service: "OpenAI",
            var: "OPENAI_API_KEY",
        })
    }

    pub fn store(&self) -> Result<&dyn DocumentStore, AppError> {
        self.store.as_deref().ok_or(AppError::StoreUnavailable)
    }

    /// Mistral agent → Mistral model → configured fallbacks.
    pub fn provider_chain(&self) -> Result<ProviderChain, AppError> {
        let mistral = self.mistral.clone().ok_or(AppError::NotConfigured {
            service: "Mistral",
            var: "MISTRAL_API_KEY",
        })?;

        let mut links = vec![
            ChainLink {
                label: "mistral-agent",
                client: mistral.clone(),
                target: ChatTarget::Agent(self.config.mistral_agent_id.clone()),
            },
            ChainLink {
                label: "mistral",
                client: mistral,
                target: ChatTarget::Model(MISTRAL_SMALL_LATEST.to_string()),
            },
        ];
        links.extend(self.chat_fallbacks.iter().cloned());
        Ok(ProviderChain::new(links))
    }
}
