//! Learner feedback: one outbound call per check, then normalization.
//!
//! Each check owns a draft type (what the model was asked to return), a shape
//! function (draft → record with per-field defaults) and its fallback records.

use serde::Deserialize;

use crate::errors::AppError;
use crate::feedback::prompts;
use crate::feedback::VocabularyHint;
use crate::llm_client::chat::MISTRAL_SMALL;
use crate::llm_client::gemini::FLASH_LITE_001;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, GenerateRequest, GenerativeModel, LlmError};
use crate::models::feedback::{
    AnswerCheck, SentenceFeedback, SpokenAnswerFeedback, StatementFeedback, WordSuggestions,
};
use crate::models::language::{Language, LearnerSubmission};
use crate::normalize::fields::{lenient, list_or, non_blank, score_or, strings, text_or, truncate};
use crate::normalize::{normalize, normalize_absorbing, Normalized};

const MAX_VOCABULARY_IMPROVEMENTS: usize = 3;
const MAX_LIST_ITEMS: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Discussion statement
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementDraft {
    #[serde(default, deserialize_with = "lenient")]
    brief_feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    vocabulary_improvements: Option<Vec<String>>,
}

fn shape_statement(draft: StatementDraft) -> StatementFeedback {
    StatementFeedback {
        brief_feedback: text_or(draft.brief_feedback, "Great job expressing your thoughts clearly!"),
        vocabulary_improvements: truncate(
            list_or(draft.vocabulary_improvements, || {
                strings(&["Try using more specific adjectives to strengthen your arguments"])
            }),
            MAX_VOCABULARY_IMPROVEMENTS,
        ),
    }
}

fn statement_unparsed() -> StatementFeedback {
    StatementFeedback {
        brief_feedback:
            "You presented your position clearly and provided relevant supporting points.".into(),
        vocabulary_improvements: strings(&[
            "Consider using transition words like 'furthermore' or 'however' to connect ideas",
            "Try replacing common words with more sophisticated alternatives",
            "Use specific examples to make your arguments more compelling",
        ]),
    }
}

fn statement_unreachable() -> StatementFeedback {
    StatementFeedback {
        brief_feedback: "You did well articulating your perspective on this topic.".into(),
        vocabulary_improvements: strings(&[
            "Expand your vocabulary with more precise adjectives",
            "Use connecting phrases to improve flow between ideas",
            "Include specific examples to support your points",
        ]),
    }
}

/// Never fails: both parse and upstream failures degrade to encouraging text.
pub async fn analyze_statement(
    gemini: &dyn GenerativeModel,
    submission: &LearnerSubmission,
    position: &str,
    context: &str,
) -> Normalized<StatementFeedback> {
    let prompt = prompts::statement_prompt(submission, position, context);
    let reply = gemini
        .generate(&GenerateRequest::prompt(FLASH_LITE_001, &prompt, 0.3, 300))
        .await;

    normalize_absorbing(
        "analyze-statement-response",
        reply,
        shape_statement,
        statement_unparsed,
        statement_unreachable,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Sentence check
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentenceDraft {
    #[serde(default, deserialize_with = "lenient")]
    is_correct: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    improved_sentence: Option<String>,
}

fn shape_sentence(draft: SentenceDraft) -> SentenceFeedback {
    SentenceFeedback {
        is_correct: draft.is_correct.unwrap_or(false),
        feedback: text_or(
            draft.feedback,
            "I couldn't properly analyze your sentence, but it looks like you're making an effort. \
             Keep practicing!",
        ),
        improved_sentence: non_blank(draft.improved_sentence),
    }
}

fn sentence_unparsed() -> SentenceFeedback {
    SentenceFeedback {
        is_correct: false,
        feedback: "I encountered an error while analyzing your sentence, but it's great that you're \
                   practicing. Try again with another sentence!"
            .into(),
        improved_sentence: None,
    }
}

/// `submission.source_text` is the practised word.
pub async fn check_sentence(
    gemini: &dyn GenerativeModel,
    submission: &LearnerSubmission,
) -> Result<Normalized<SentenceFeedback>, AppError> {
    let prompt = prompts::sentence_prompt(submission);
    let reply = gemini
        .generate(&GenerateRequest::prompt(FLASH_LITE_001, &prompt, 0.2, 1024))
        .await?;

    Ok(normalize("check-sentence", &reply, shape_sentence, sentence_unparsed))
}

// ────────────────────────────────────────────────────────────────────────────
// Expected-word check
// ────────────────────────────────────────────────────────────────────────────

const NO_FEEDBACK: &str = "No feedback available.";

/// Correctness is decided locally; the model only writes the feedback text.
pub fn answer_contains(answer: &str, expected: &str) -> bool {
    answer
        .trim()
        .to_lowercase()
        .contains(&expected.trim().to_lowercase())
}

pub async fn check_answer(
    mistral: &dyn ChatModel,
    submission: &LearnerSubmission,
    expected: &str,
) -> Result<AnswerCheck, AppError> {
    let request = ChatRequest::model(
        MISTRAL_SMALL,
        vec![
            ChatMessage::system(prompts::ANSWER_CHECK_SYSTEM),
            ChatMessage::user(prompts::answer_check_user(
                &submission.source_text,
                &submission.learner_response,
                expected,
            )),
        ],
    )
    .sampling(0.7, 300);

    let feedback = match mistral.complete(&request).await {
        Ok(text) => text,
        Err(LlmError::EmptyContent { .. }) => NO_FEEDBACK.to_string(),
        Err(err) => return Err(err.into()),
    };

    let is_correct = answer_contains(&submission.learner_response, expected);
    Ok(AnswerCheck {
        is_correct,
        feedback,
        score: if is_correct { 5 } else { 2 },
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Spoken answer (islands)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpokenAnswerDraft {
    #[serde(default, deserialize_with = "lenient")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    improved_answer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    improvements: Option<Vec<String>>,
}

fn shape_spoken_answer(draft: SpokenAnswerDraft, answer: &str) -> SpokenAnswerFeedback {
    SpokenAnswerFeedback {
        score: score_or(draft.score, 75, 1, 100),
        feedback: text_or(
            draft.feedback,
            "Good effort! Keep practicing to improve your language skills.",
        ),
        improved_answer: text_or(draft.improved_answer, answer),
        strengths: truncate(
            list_or(draft.strengths, || {
                strings(&[
                    "You attempted the question",
                    "You used relevant language",
                    "You stayed on topic",
                ])
            }),
            MAX_LIST_ITEMS,
        ),
        improvements: truncate(
            list_or(draft.improvements, || {
                strings(&[
                    "Try to expand your ideas",
                    "Use more varied vocabulary",
                    "Practice connecting sentences smoothly",
                ])
            }),
            MAX_LIST_ITEMS,
        ),
    }
}

fn spoken_answer_unparsed(answer: &str) -> SpokenAnswerFeedback {
    SpokenAnswerFeedback {
        score: 70,
        feedback: "I had trouble analyzing your response in detail, but you're making good progress! \
                   Keep practicing and focus on using clear, complete sentences."
            .into(),
        improved_answer: answer.to_string(),
        strengths: strings(&[
            "You provided a response",
            "You attempted to answer the question",
            "You're practicing actively",
        ]),
        improvements: strings(&[
            "Try to expand your ideas",
            "Use more descriptive language",
            "Practice organizing your thoughts clearly",
        ]),
    }
}

pub async fn evaluate_spoken_answer(
    gemini: &dyn GenerativeModel,
    submission: &LearnerSubmission,
    hints: &[String],
    vocabulary: &[VocabularyHint],
) -> Result<Normalized<SpokenAnswerFeedback>, AppError> {
    let prompt = prompts::spoken_answer_prompt(submission, hints, vocabulary);
    let reply = gemini
        .generate(&GenerateRequest::prompt(FLASH_LITE_001, &prompt, 0.3, 1024))
        .await?;

    let answer = submission.learner_response.as_str();
    Ok(normalize(
        "islands.check-answer",
        &reply,
        |d| shape_spoken_answer(d, answer),
        || spoken_answer_unparsed(answer),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Usage suggestions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UsageDraft {
    #[serde(default, deserialize_with = "lenient")]
    examples: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    tips: Option<Vec<String>>,
}

fn shape_usage(draft: UsageDraft) -> WordSuggestions {
    WordSuggestions {
        examples: truncate(draft.examples.unwrap_or_default(), MAX_LIST_ITEMS),
        tips: truncate(draft.tips.unwrap_or_default(), MAX_LIST_ITEMS),
    }
}

fn usage_unparsed(word: &str) -> WordSuggestions {
    WordSuggestions {
        examples: vec![
            format!("Here's an example with \"{word}\"."),
            format!("You can use \"{word}\" in various contexts."),
        ],
        tips: vec![
            format!("Try to use \"{word}\" in everyday conversations."),
            "Practice makes perfect!".to_string(),
        ],
    }
}

pub async fn suggest_usage(
    gemini: &dyn GenerativeModel,
    word: &str,
    language: Language,
) -> Result<Normalized<WordSuggestions>, AppError> {
    let prompt = prompts::usage_prompt(word, language);
    let reply = gemini
        .generate(&GenerateRequest::prompt(FLASH_LITE_001, &prompt, 0.3, 1024))
        .await?;

    Ok(normalize("word-suggestions", &reply, shape_usage, || usage_unparsed(word)))
}
