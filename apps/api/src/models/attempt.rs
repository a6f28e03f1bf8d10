use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored speaking/writing attempt for one island question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttemptRow {
    pub id: Uuid,
    pub question_id: i64,
    pub subtopic_id: String,
    pub island_id: String,
    pub user_id: String,
    pub user_answer: String,
    pub score: f64,
    pub revised_polished_version: String,
    pub natural_chunks: Value,
    pub feedback: String,
    pub improved_answer: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub is_text_input: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated attempt ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttempt {
    pub question_id: i64,
    pub subtopic_id: String,
    pub island_id: String,
    pub user_id: String,
    pub user_answer: String,
    pub score: f64,
    pub revised_polished_version: String,
    pub natural_chunks: Vec<Value>,
    pub feedback: String,
    pub improved_answer: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub is_text_input: bool,
}

/// Identifies the attempts of one learner on one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptKey {
    pub question_id: i64,
    pub subtopic_id: String,
    pub island_id: String,
    pub user_id: String,
}

/// Wire view of an attempt, newest first in listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub id: String,
    pub question_id: i64,
    pub subtopic_id: String,
    pub island_id: String,
    pub user_answer: String,
    pub score: f64,
    #[serde(rename = "revised_polished_version")]
    pub revised_polished_version: String,
    #[serde(rename = "natural_chunks")]
    pub natural_chunks: Value,
    pub feedback: String,
    pub improved_answer: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub is_text_input: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<AttemptRow> for AttemptView {
    fn from(row: AttemptRow) -> Self {
        let revised = if row.revised_polished_version.is_empty() {
            row.improved_answer.clone()
        } else {
            row.revised_polished_version
        };
        Self {
            id: row.id.to_string(),
            question_id: row.question_id,
            subtopic_id: row.subtopic_id,
            island_id: row.island_id,
            user_answer: row.user_answer,
            score: row.score,
            revised_polished_version: revised,
            natural_chunks: row.natural_chunks,
            feedback: row.feedback,
            improved_answer: row.improved_answer,
            strengths: row.strengths,
            improvements: row.improvements,
            is_text_input: row.is_text_input,
            timestamp: row.created_at,
        }
    }
}
