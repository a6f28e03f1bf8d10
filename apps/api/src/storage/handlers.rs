//! Axum route handlers for stored attempts and library sync.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::attempt::AttemptView;
use crate::routes::extract::{ApiJson, ApiQuery};
use crate::state::AppState;
use crate::storage::attempts::{AttemptQuery, SaveAttemptRequest};
use crate::storage::sync::{self, BackupRequest, BackupSummary};

/// POST /api/islands/save-attempt
pub async fn handle_save_attempt(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SaveAttemptRequest>,
) -> Result<Json<Value>, AppError> {
    let store = state.store()?;
    let attempt = request.into_attempt()?;
    let id = store.insert_attempt(&attempt).await?;

    tracing::info!(attempt_id = %id, question_id = attempt.question_id, "attempt saved");
    Ok(Json(json!({
        "success": true,
        "attemptId": id.to_string(),
        "message": "Attempt saved successfully",
    })))
}

/// GET /api/islands/save-attempt?questionId=&subtopicId=&islandId=&userId=
pub async fn handle_list_attempts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AttemptQuery>,
) -> Result<Json<Value>, AppError> {
    let store = state.store()?;
    let key = query.into_key()?;
    let attempts: Vec<AttemptView> = store
        .list_attempts(&key)
        .await?
        .into_iter()
        .map(AttemptView::from)
        .collect();

    Ok(Json(json!({ "success": true, "attempts": attempts })))
}

/// POST /api/sync/backup
pub async fn handle_backup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BackupRequest>,
) -> Result<Json<Value>, AppError> {
    let store = state.store()?;
    let summary = sync::backup(store, request).await?;
    Ok(Json(json!({ "success": true, "data": summary })))
}

/// GET /api/sync/restore/:username
pub async fn handle_restore(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = state.store()?;
    let backup = sync::restore(store, &username).await?;

    Ok(Json(json!({
        "success": true,
        "data": BackupSummary::from(&backup),
        "library": backup.library,
        "points": backup.points,
    })))
}
