//! Axum route handlers for learner feedback.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::feedback::{evaluate, VocabularyHint};
use crate::models::feedback::{
    AnswerCheck, SentenceFeedback, SpokenAnswerFeedback, StatementFeedback, WordSuggestions,
};
use crate::models::language::{Language, LearnerSubmission};
use crate::normalize::fields::non_blank;
use crate::normalize::Normalized;
use crate::routes::extract::ApiJson;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRequest {
    pub statement: Option<String>,
    pub position: Option<String>,
    pub user_response: Option<String>,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct SentenceRequest {
    pub sentence: Option<String>,
    pub word: Option<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheckRequest {
    pub answer: Option<String>,
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct SpokenAnswerRequest {
    pub answer: Option<String>,
    pub question: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyHint>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct UsageRequest {
    pub word: Option<String>,
    #[serde(default)]
    pub language: Language,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-statement-response
pub async fn handle_analyze_statement(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StatementRequest>,
) -> Result<Normalized<StatementFeedback>, AppError> {
    let gemini = state.gemini()?;
    let (Some(statement), Some(position), Some(response)) = (
        non_blank(request.statement),
        non_blank(request.position),
        non_blank(request.user_response),
    ) else {
        return Err(AppError::validation(
            "Statement, position, and user response are required",
        ));
    };

    let submission = LearnerSubmission::new(statement, response, Language::En);
    Ok(evaluate::analyze_statement(gemini, &submission, &position, &request.context).await)
}

/// POST /api/check-sentence
pub async fn handle_check_sentence(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SentenceRequest>,
) -> Result<Normalized<SentenceFeedback>, AppError> {
    let gemini = state.gemini()?;
    let (Some(sentence), Some(word)) = (non_blank(request.sentence), non_blank(request.word)) else {
        return Err(AppError::validation("Both sentence and word are required"));
    };

    let submission = LearnerSubmission::new(word, sentence, request.language);
    evaluate::check_sentence(gemini, &submission).await
}

/// POST /api/check-answer
pub async fn handle_check_answer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnswerCheckRequest>,
) -> Result<Json<AnswerCheck>, AppError> {
    let mistral = state.mistral()?;
    let (Some(answer), Some(expected)) = (non_blank(request.answer), non_blank(request.correct_answer))
    else {
        return Err(AppError::validation("Answer and correct answer are required"));
    };

    let submission = LearnerSubmission::new(request.question, answer, Language::En);
    let check = evaluate::check_answer(mistral, &submission, &expected).await?;
    Ok(Json(check))
}

/// POST /api/islands/check-answer
pub async fn handle_islands_check_answer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SpokenAnswerRequest>,
) -> Result<Normalized<SpokenAnswerFeedback>, AppError> {
    let gemini = state.gemini()?;
    let (Some(answer), Some(question)) = (non_blank(request.answer), non_blank(request.question))
    else {
        return Err(AppError::validation("Both answer and question are required"));
    };

    let submission = LearnerSubmission::new(question, answer, request.language);
    evaluate::evaluate_spoken_answer(gemini, &submission, &request.hints, &request.vocabulary).await
}

/// POST /api/word-suggestions
pub async fn handle_word_suggestions(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UsageRequest>,
) -> Result<Normalized<WordSuggestions>, AppError> {
    let gemini = state.gemini()?;
    let word = non_blank(request.word).ok_or_else(|| AppError::validation("Word is required"))?;

    evaluate::suggest_usage(gemini, &word, request.language).await
}
