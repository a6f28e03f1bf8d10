use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{ "error": <message>, "code": <CODE> }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{service} API key is not configured. Please set the {var} environment variable.")]
    NotConfigured {
        service: &'static str,
        var: &'static str,
    },

    #[error("Document store is not configured")]
    StoreUnavailable,

    #[error("{0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::NotConfigured { .. } | AppError::StoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "NOT_CONFIGURED")
            }
            AppError::Llm(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            AppError::Llm(msg) => tracing::error!("LLM error: {msg}"),
            AppError::Store(e) => tracing::error!("Storage error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::NotConfigured { var, .. } => tracing::error!("{var} is not set"),
            _ => {}
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_configured_names_the_variable() {
        let (status, body) = render(AppError::NotConfigured {
            service: "Google",
            var: "GOOGLE_API_KEY",
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "NOT_CONFIGURED");
        assert!(body["error"].as_str().unwrap().contains("GOOGLE_API_KEY"));
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = render(AppError::validation("Word is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Word is required");
    }

    #[tokio::test]
    async fn test_upstream_message_is_embedded() {
        let (status, body) =
            render(AppError::from(LlmError::EmptyContent { provider: "Gemini" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "LLM_ERROR");
        assert_eq!(body["error"], "Empty response from Gemini API");
    }
}
