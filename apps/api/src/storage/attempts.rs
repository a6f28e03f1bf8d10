//! Practice attempts: validating what the client saves and what it queries.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::attempt::{AttemptKey, NewAttempt};
use crate::normalize::fields::{lenient, non_blank};

const ANONYMOUS: &str = "anonymous";
const MISSING_FIELDS: &str = "Missing required fields: questionId, subtopicId, islandId, userAnswer";
const MISSING_PARAMS: &str = "Missing required query parameters: questionId, subtopicId, islandId";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttemptRequest {
    #[serde(default)]
    pub question_id: Option<Value>,
    pub subtopic_id: Option<String>,
    pub island_id: Option<String>,
    pub user_id: Option<String>,
    pub user_answer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(rename = "revised_polished_version", default, deserialize_with = "lenient")]
    pub revised_polished_version: Option<String>,
    #[serde(rename = "natural_chunks", default, deserialize_with = "lenient")]
    pub natural_chunks: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub improved_answer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub improvements: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_text_input: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptQuery {
    pub question_id: Option<String>,
    pub subtopic_id: Option<String>,
    pub island_id: Option<String>,
    pub user_id: Option<String>,
}

/// A question id arrives as a number or as a numeric string.
pub fn parse_question_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.filter(|id| *id != 0)
}

impl SaveAttemptRequest {
    pub fn into_attempt(self) -> Result<NewAttempt, AppError> {
        let question_id = self.question_id.as_ref().and_then(parse_question_id);
        let (Some(question_id), Some(subtopic_id), Some(island_id), Some(user_answer)) = (
            question_id,
            non_blank(self.subtopic_id),
            non_blank(self.island_id),
            non_blank(self.user_answer),
        ) else {
            return Err(AppError::validation(MISSING_FIELDS));
        };

        let revised = non_blank(self.revised_polished_version);
        let improved = non_blank(self.improved_answer);

        Ok(NewAttempt {
            question_id,
            subtopic_id,
            island_id,
            user_id: non_blank(self.user_id).unwrap_or_else(|| ANONYMOUS.to_string()),
            user_answer,
            score: self.score.unwrap_or(0.0),
            revised_polished_version: revised.clone().or_else(|| improved.clone()).unwrap_or_default(),
            natural_chunks: self.natural_chunks.unwrap_or_default(),
            feedback: self.feedback.unwrap_or_default(),
            improved_answer: improved.or(revised).unwrap_or_default(),
            strengths: self.strengths.unwrap_or_default(),
            improvements: self.improvements.unwrap_or_default(),
            is_text_input: self.is_text_input.unwrap_or(true),
        })
    }
}

impl AttemptQuery {
    pub fn into_key(self) -> Result<AttemptKey, AppError> {
        let question_id = non_blank(self.question_id).map(|q| parse_question_id(&Value::String(q)));
        let (Some(question_id), Some(subtopic_id), Some(island_id)) = (
            question_id,
            non_blank(self.subtopic_id),
            non_blank(self.island_id),
        ) else {
            return Err(AppError::validation(MISSING_PARAMS));
        };
        let question_id = question_id.ok_or_else(|| AppError::validation("questionId must be a number"))?;

        Ok(AttemptKey {
            question_id,
            subtopic_id,
            island_id,
            user_id: non_blank(self.user_id).unwrap_or_else(|| ANONYMOUS.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SaveAttemptRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_question_id_number_or_string() {
        assert_eq!(parse_question_id(&json!(12)), Some(12));
        assert_eq!(parse_question_id(&json!(" 7 ")), Some(7));
        assert_eq!(parse_question_id(&json!("seven")), None);
        assert_eq!(parse_question_id(&json!(null)), None);
    }

    #[test]
    fn test_minimal_attempt_gets_defaults() {
        let attempt = request(json!({
            "questionId": "3",
            "subtopicId": "travel",
            "islandId": "island-1",
            "userAnswer": "I would take the train."
        }))
        .into_attempt()
        .unwrap();

        assert_eq!(attempt.question_id, 3);
        assert_eq!(attempt.user_id, "anonymous");
        assert_eq!(attempt.score, 0.0);
        assert!(attempt.is_text_input);
        assert!(attempt.natural_chunks.is_empty());
    }

    #[test]
    fn test_polished_and_improved_back_fill() {
        let attempt = request(json!({
            "questionId": 1, "subtopicId": "s", "islandId": "i", "userAnswer": "a",
            "improvedAnswer": "better"
        }))
        .into_attempt()
        .unwrap();
        assert_eq!(attempt.revised_polished_version, "better");
        assert_eq!(attempt.improved_answer, "better");

        let attempt = request(json!({
            "questionId": 1, "subtopicId": "s", "islandId": "i", "userAnswer": "a",
            "revised_polished_version": "polished"
        }))
        .into_attempt()
        .unwrap();
        assert_eq!(attempt.improved_answer, "polished");
    }

    #[test]
    fn test_non_array_lists_become_empty() {
        let attempt = request(json!({
            "questionId": 1, "subtopicId": "s", "islandId": "i", "userAnswer": "a",
            "strengths": "clear", "natural_chunks": {"a": 1}
        }))
        .into_attempt()
        .unwrap();
        assert!(attempt.strengths.is_empty());
        assert!(attempt.natural_chunks.is_empty());
    }

    #[test]
    fn test_missing_answer_rejected() {
        let err = request(json!({"questionId": 1, "subtopicId": "s", "islandId": "i"}))
            .into_attempt()
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);
    }

    #[test]
    fn test_query_requires_ids() {
        let query = AttemptQuery {
            question_id: Some("4".into()),
            subtopic_id: None,
            island_id: Some("i".into()),
            user_id: None,
        };
        assert_eq!(query.into_key().unwrap_err().to_string(), MISSING_PARAMS);

        let query = AttemptQuery {
            question_id: Some("4".into()),
            subtopic_id: Some("s".into()),
            island_id: Some("i".into()),
            user_id: None,
        };
        let key = query.into_key().unwrap();
        assert_eq!(key.question_id, 4);
        assert_eq!(key.user_id, "anonymous");
    }
}
