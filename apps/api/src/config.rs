use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// Agent used for follow-ups and word lookups.
pub const DEFAULT_MISTRAL_AGENT_ID: &str = "ag:7fe871ed:20250409:snapwort:7c2cd028";
/// Agent that produces one vocabulary task per language code.
pub const DEFAULT_MISTRAL_TASK_AGENT_ID: &str =
    "ag:7fe871ed:20250410:aktiverwortschatz:04e94ebd";

/// Application configuration loaded from environment variables.
///
/// Provider keys are optional: a missing key disables the routes that need it
/// (they answer 500 `NOT_CONFIGURED`) but never stops the server from starting.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub mistral_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub database_url: Option<String>,
    pub mistral_agent_id: String,
    pub mistral_task_agent_id: String,
    pub gemini_base_url: String,
    pub mistral_base_url: String,
    pub openai_base_url: String,
    pub groq_base_url: String,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            google_api_key: optional("GOOGLE_API_KEY"),
            mistral_api_key: optional("MISTRAL_API_KEY"),
            openai_api_key: optional("OPENAI_API_KEY"),
            groq_api_key: optional("GROQ_API_KEY"),
            database_url: optional("DATABASE_URL"),
            mistral_agent_id: or_default("MISTRAL_AGENT_ID", DEFAULT_MISTRAL_AGENT_ID),
            mistral_task_agent_id: or_default(
                "MISTRAL_TASK_AGENT_ID",
                DEFAULT_MISTRAL_TASK_AGENT_ID,
            ),
            gemini_base_url: or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            mistral_base_url: or_default("MISTRAL_BASE_URL", DEFAULT_MISTRAL_BASE_URL),
            openai_base_url: or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            groq_base_url: or_default("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
            llm_timeout_secs: or_default("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}
