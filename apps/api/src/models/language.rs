use serde::{Deserialize, Serialize};

/// Target language of a learner. Anything other than `en` / `de` is rejected
/// at deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    /// English name, as used inside prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "German",
        }
    }
}

/// Selects the prompt template and response style of a lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Definition,
    Check,
    Ask,
}

/// One earlier exchange of a follow-up conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

/// What a learner sent in for evaluation. Built per request, never stored.
#[derive(Debug, Clone)]
pub struct LearnerSubmission {
    /// The prompt, statement or question the learner responded to.
    pub source_text: String,
    pub learner_response: String,
    pub language: Language,
    pub history: Vec<ChatTurn>,
}

impl LearnerSubmission {
    pub fn new(
        source_text: impl Into<String>,
        learner_response: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            learner_response: learner_response.into(),
            language,
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_serde_lowercase() {
        let lang: Language = serde_json::from_str(r#""de""#).unwrap();
        assert_eq!(lang, Language::De);
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), r#""en""#);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(serde_json::from_str::<Language>(r#""fr""#).is_err());
    }

    #[test]
    fn test_query_type_defaults_to_definition() {
        assert_eq!(QueryType::default(), QueryType::Definition);
        let ask: QueryType = serde_json::from_str(r#""ask""#).unwrap();
        assert_eq!(ask, QueryType::Ask);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(Language::En.name(), "English");
        assert_eq!(Language::De.name(), "German");
        assert_eq!(Language::De.code(), "de");
    }
}
