//! Response records returned by the language routes.
//!
//! Every record here is fully populated before it leaves the server: missing
//! upstream fields are filled by the shaping step, never surfaced as `null`
//! (except the documented optional `improvedSentence`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementFeedback {
    pub brief_feedback: String,
    /// At most three items.
    pub vocabulary_improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceFeedback {
    pub is_correct: bool,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improved_sentence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub feedback: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokenAnswerFeedback {
    /// 1 – 100
    pub score: u32,
    pub feedback: String,
    pub improved_answer: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSuggestions {
    pub examples: Vec<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageAssistance {
    pub title: String,
    pub answer: String,
    /// Exactly four follow-up questions.
    pub suggestions: Vec<String>,
    pub model_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpAnswer {
    pub answer: String,
    pub model_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeTask {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub question: String,
    pub answer: String,
    pub alternative_words: Vec<String>,
    pub example: String,
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMission {
    pub statement: String,
    pub context: String,
    pub mission_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionContext {
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub transcription: String,
}
