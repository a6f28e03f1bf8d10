pub mod extract;
pub mod health;


use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{assistant, feedback, practice, speech, storage};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Feedback
        .route(
            "/api/analyze-statement-response",
            post(feedback::handlers::handle_analyze_statement),
        )
        .route(
            "/api/check-sentence",
            post(feedback::handlers::handle_check_sentence),
        )
        .route(
            "/api/check-answer",
            post(feedback::handlers::handle_check_answer),
        )
        .route(
            "/api/islands/check-answer",
            post(feedback::handlers::handle_islands_check_answer),
        )
        .route(
            "/api/word-suggestions",
            post(feedback::handlers::handle_word_suggestions),
        )
        // Assistant
        .route(
            "/api/gemini-language",
            post(assistant::handlers::handle_gemini_language),
        )
        .route("/api/meaning", post(assistant::handlers::handle_meaning))
        .route(
            "/api/gemini-followup",
            post(assistant::handlers::handle_gemini_followup),
        )
        .route("/api/followup", post(assistant::handlers::handle_followup))
        // Practice
        .route(
            "/api/generate-tasks",
            post(practice::handlers::handle_generate_tasks),
        )
        .route(
            "/api/generate-tasks-own",
            post(practice::handlers::handle_generate_own_tasks),
        )
        .route(
            "/api/generate-context",
            post(practice::handlers::handle_generate_context),
        )
        .route(
            "/api/generate-custom-mission",
            post(practice::handlers::handle_generate_custom_mission),
        )
        // Speech
        .route(
            "/api/transcribe-audio",
            post(speech::handlers::handle_transcribe_audio)
                .layer(DefaultBodyLimit::max(speech::UPLOAD_BODY_LIMIT)),
        )
        // Storage
        .route(
            "/api/islands/save-attempt",
            get(storage::handlers::handle_list_attempts)
                .post(storage::handlers::handle_save_attempt),
        )
        .route("/api/sync/backup", post(storage::handlers::handle_backup))
        .route(
            "/api/sync/restore/:username",
            get(storage::handlers::handle_restore),
        )
        .with_state(state)
}
