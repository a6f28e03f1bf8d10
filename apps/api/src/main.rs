mod assistant;
mod config;
mod db;
mod errors;
mod feedback;
mod llm_client;
mod models;
mod normalize;
mod practice;
mod routes;
mod speech;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::chain::ChainLink;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema, DocumentStore, PgDocumentStore};
use crate::llm_client::chat::{GROQ_CHAT_MODEL, OPENAI_CHAT_MODEL};
use crate::llm_client::{
    http_client, ChatCompletionsClient, ChatModel, ChatTarget, GeminiClient, GenerativeModel,
    Transcriber, WhisperClient,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SnapWort API v{}", env!("CARGO_PKG_VERSION"));

    let http = http_client(config.llm_timeout_secs)?;

    let gemini = config.google_api_key.clone().map(|key| {
        Arc::new(GeminiClient::new(http.clone(), key, config.gemini_base_url.clone()))
            as Arc<dyn GenerativeModel>
    });
    let mistral = config.mistral_api_key.clone().map(|key| {
        Arc::new(ChatCompletionsClient::mistral(
            http.clone(),
            key,
            config.mistral_base_url.clone(),
        )) as Arc<dyn ChatModel>
    });
    let transcriber = config.openai_api_key.clone().map(|key| {
        Arc::new(WhisperClient::new(http.clone(), key, config.openai_base_url.clone()))
            as Arc<dyn Transcriber>
    });

    let mut chat_fallbacks = Vec::new();
    if let Some(key) = config.openai_api_key.clone() {
        chat_fallbacks.push(ChainLink {
            label: "openai",
            client: Arc::new(ChatCompletionsClient::openai(
                http.clone(),
                key,
                config.openai_base_url.clone(),
            )),
            target: ChatTarget::Model(OPENAI_CHAT_MODEL.to_string()),
        });
    }
    if let Some(key) = config.groq_api_key.clone() {
        chat_fallbacks.push(ChainLink {
            label: "groq",
            client: Arc::new(ChatCompletionsClient::groq(
                http.clone(),
                key,
                config.groq_base_url.clone(),
            )),
            target: ChatTarget::Model(GROQ_CHAT_MODEL.to_string()),
        });
    }

    for (name, present) in [
        ("GOOGLE_API_KEY", gemini.is_some()),
        ("MISTRAL_API_KEY", mistral.is_some()),
        ("OPENAI_API_KEY", transcriber.is_some()),
    ] {
        if !present {
            warn!("{name} is not set; routes that need it will answer NOT_CONFIGURED");
        }
    }
    info!(fallbacks = chat_fallbacks.len(), "LLM clients initialized");

    // Initialize PostgreSQL (optional)
    let store = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Some(Arc::new(PgDocumentStore::new(pool)) as Arc<dyn DocumentStore>)
        }
        None => {
            warn!("DATABASE_URL is not set; storage routes are disabled");
            None
        }
    };

    let state = AppState {
        gemini,
        mistral,
        chat_fallbacks,
        transcriber,
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
