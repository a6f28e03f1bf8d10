use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which upstream collaborators are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "snapwort-api",
        "providers": {
            "gemini": state.gemini.is_some(),
            "mistral": state.mistral.is_some(),
            "whisper": state.transcriber.is_some(),
            "store": state.store.is_some(),
        }
    }))
}
