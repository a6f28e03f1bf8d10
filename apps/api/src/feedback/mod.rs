//! Learner feedback: statement discussion, sentence and answer checks, spoken
//! answers and usage suggestions.

pub mod evaluate;
pub mod handlers;
pub mod prompts;

use serde::Deserialize;

/// A vocabulary item attached to an islands question.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyHint {
    pub text: String,
    pub meaning: String,
    #[serde(rename = "type")]
    pub kind: String,
}
