//! Axum route handlers for the language assistant.

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use crate::assistant::{followup, lookup};
use crate::errors::AppError;
use crate::models::feedback::{FollowUpAnswer, LanguageAssistance};
use crate::models::language::{ChatTurn, Language, LearnerSubmission, QueryType};
use crate::normalize::fields::non_blank;
use crate::normalize::Normalized;
use crate::routes::extract::ApiJson;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub word: Option<String>,
    pub language: Option<Language>,
    pub query_type: Option<QueryType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    pub question: Option<String>,
    pub language: Option<Language>,
    #[serde(default)]
    pub previous_context: Vec<ChatTurn>,
}

impl FollowUpRequest {
    fn into_submission(self, question: String, language: Language) -> LearnerSubmission {
        let mut submission = LearnerSubmission::new("", question, language);
        submission.history = self.previous_context;
        submission
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/gemini-language
pub async fn handle_gemini_language(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LookupRequest>,
) -> Result<Normalized<LanguageAssistance>, AppError> {
    let gemini = state.gemini()?;
    let word = non_blank(request.word)
        .ok_or_else(|| AppError::validation("Word or query is required"))?;
    let language = request.language.unwrap_or_default();
    let query_type = request.query_type.unwrap_or_default();

    info!(?language, ?query_type, "gemini-language lookup");
    lookup::gemini_lookup(gemini, &word, language, query_type).await
}

/// POST /api/meaning
pub async fn handle_meaning(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LookupRequest>,
) -> Result<Normalized<LanguageAssistance>, AppError> {
    let chain = state.provider_chain()?;
    let (Some(word), Some(language)) = (non_blank(request.word), request.language) else {
        return Err(AppError::validation("Word and language are required"));
    };
    let query_type = request.query_type.unwrap_or_default();

    info!(?language, ?query_type, chain = ?chain.labels(), "meaning lookup");
    Ok(lookup::chain_lookup(&chain, &word, language, query_type).await)
}

/// POST /api/gemini-followup
pub async fn handle_gemini_followup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FollowUpRequest>,
) -> Result<axum::Json<FollowUpAnswer>, AppError> {
    let gemini = state.gemini()?;
    let question = non_blank(request.question.clone())
        .ok_or_else(|| AppError::validation("Question is required"))?;
    let language = request.language.unwrap_or_default();
    let submission = request.into_submission(question, language);

    let answer = followup::gemini_follow_up(gemini, &submission).await?;
    Ok(axum::Json(answer))
}

/// POST /api/followup
pub async fn handle_followup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FollowUpRequest>,
) -> Result<Normalized<FollowUpAnswer>, AppError> {
    let chain = state.provider_chain()?;
    let (Some(question), Some(language)) = (non_blank(request.question.clone()), request.language)
    else {
        return Err(AppError::validation("Question and language are required"));
    };
    let submission = request.into_submission(question, language);

    Ok(followup::chain_follow_up(&chain, &submission).await)
}
