//! Axum route handlers for practice content.

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::feedback::{CustomMission, DiscussionContext, PracticeTask};
use crate::models::language::Language;
use crate::normalize::fields::non_blank;
use crate::normalize::Normalized;
use crate::practice::scenarios::{self, MissionData};
use crate::practice::tasks;
use crate::routes::extract::ApiJson;
use crate::state::AppState;

fn default_count() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksRequest {
    #[serde(default = "default_count")]
    pub count: u32,
    /// Accepted for compatibility; the agent does not take history.
    #[serde(default)]
    pub previous_tasks: Vec<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct OwnTasksRequest {
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct ContextRequest {
    pub statement: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionRequest {
    pub mission_data: Option<MissionData>,
}

/// POST /api/generate-tasks
pub async fn handle_generate_tasks(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TasksRequest>,
) -> Result<Normalized<Vec<PracticeTask>>, AppError> {
    let mistral = state.mistral()?;
    info!(
        language = request.language.code(),
        count = request.count,
        previous = request.previous_tasks.len(),
        "generate-tasks"
    );

    tasks::agent_tasks(mistral, &state.config.mistral_task_agent_id, request.language).await
}

/// POST /api/generate-tasks-own
pub async fn handle_generate_own_tasks(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OwnTasksRequest>,
) -> Result<Normalized<Vec<PracticeTask>>, AppError> {
    let gemini = state.gemini()?;
    tasks::own_tasks(gemini, request.count, request.language).await
}

/// POST /api/generate-context
pub async fn handle_generate_context(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ContextRequest>,
) -> Result<Normalized<DiscussionContext>, AppError> {
    let gemini = state.gemini()?;
    let statement =
        non_blank(request.statement).ok_or_else(|| AppError::validation("Statement is required"))?;

    Ok(scenarios::discussion_context(gemini, &statement).await)
}

/// POST /api/generate-custom-mission
pub async fn handle_generate_custom_mission(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MissionRequest>,
) -> Result<Normalized<CustomMission>, AppError> {
    let gemini = state.gemini()?;
    let data = request
        .mission_data
        .ok_or_else(|| AppError::validation("Mission data is required"))?;

    info!(kind = ?data.kind, sub_type = ?data.sub_type, "generate-custom-mission");
    scenarios::custom_mission(gemini, &data).await
}
