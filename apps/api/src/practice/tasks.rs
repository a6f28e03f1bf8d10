//! Vocabulary practice tasks, from the Mistral task agent or from Gemini.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::gemini::FLASH_LITE_001;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, GenerateRequest, GenerativeModel};
use crate::models::feedback::PracticeTask;
use crate::models::language::Language;
use crate::normalize::fields::{lenient, strings, text_or};
use crate::normalize::{decode, normalize, preview, Normalized};
use crate::practice::prompts;

pub const TASK_POINTS: u32 = 15;
pub const MAX_OWN_TASKS: u32 = 10;
const TASK_TYPE: &str = "free_response";

/// `task_{unix_millis}_{0..1000}`, plus `_{index}` when a batch shares a draft.
pub fn task_id(index: Option<u32>) -> String {
    let millis = Utc::now().timestamp_millis();
    let salt: u32 = rand::thread_rng().gen_range(0..1000);
    match index {
        Some(i) => format!("task_{millis}_{salt}_{i}"),
        None => format!("task_{millis}_{salt}"),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDraft {
    #[serde(default, deserialize_with = "lenient")]
    question: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    meant_word: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    alternative_words: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    example: Option<String>,
}

fn shape_task(draft: &TaskDraft, id: String, is_custom: Option<bool>) -> PracticeTask {
    PracticeTask {
        id,
        task_type: TASK_TYPE.to_string(),
        question: text_or(draft.question.clone(), ""),
        answer: text_or(draft.meant_word.clone(), ""),
        alternative_words: draft.alternative_words.clone().unwrap_or_default(),
        example: text_or(draft.example.clone(), ""),
        points: TASK_POINTS,
        is_custom,
    }
}

fn canned_agent_task() -> PracticeTask {
    PracticeTask {
        id: task_id(None),
        task_type: TASK_TYPE.to_string(),
        question: "How would you use the phrase 'to make progress' in a sentence about learning a new skill?"
            .into(),
        answer: "make progress".into(),
        alternative_words: strings(&["advance", "improve", "develop", "move forward"]),
        example: "I need to make progress with my Spanish before my trip to Mexico next month.".into(),
        points: TASK_POINTS,
        is_custom: None,
    }
}

fn canned_own_task(language: Language) -> PracticeTask {
    let (question, answer, alternatives, example) = match language {
        Language::En => (
            "How would you express 'I'm making progress' in a sentence about learning a new language?",
            "making progress",
            strings(&["improving", "advancing", "developing"]),
            "I'm making progress with my Spanish vocabulary.",
        ),
        Language::De => (
            "Wie würden Sie 'Ich mache Fortschritte' in einem Satz über das Erlernen einer neuen Sprache verwenden?",
            "Fortschritte machen",
            strings(&["sich verbessern", "vorankommen", "sich entwickeln"]),
            "Ich mache Fortschritte mit meinem spanischen Wortschatz.",
        ),
    };
    PracticeTask {
        id: task_id(None),
        task_type: TASK_TYPE.to_string(),
        question: question.into(),
        answer: answer.into(),
        alternative_words: alternatives,
        example: example.into(),
        points: TASK_POINTS,
        is_custom: Some(true),
    }
}

/// Asks the task agent for one task. The language code is the whole prompt;
/// the agent carries its own instructions.
///
/// An undecodable reply degrades to a canned task for English and fails the
/// request for German.
pub async fn agent_tasks(
    mistral: &dyn ChatModel,
    agent_id: &str,
    language: Language,
) -> Result<Normalized<Vec<PracticeTask>>, AppError> {
    info!(agent_id, language = language.code(), "calling task agent");
    let request = ChatRequest::agent(agent_id, vec![ChatMessage::user(language.code())]);
    let content = mistral.complete(&request).await?;

    match decode::<TaskDraft>(&content) {
        Ok(draft) => Ok(Normalized::fresh(vec![shape_task(&draft, task_id(None), None)])),
        Err(err) if language == Language::En => {
            warn!(error = %err, preview = %preview(&content), "task agent reply undecodable, using canned task");
            Ok(Normalized::degraded(vec![canned_agent_task()]))
        }
        Err(err) => Err(AppError::Llm(format!(
            "Failed to parse Mistral agent response: {err}. Raw response: {content}"
        ))),
    }
}

/// `count` tasks (clamped to 1..=10) built from a single Gemini draft.
pub async fn own_tasks(
    gemini: &dyn GenerativeModel,
    count: u32,
    language: Language,
) -> Result<Normalized<Vec<PracticeTask>>, AppError> {
    let count = count.clamp(1, MAX_OWN_TASKS);
    let prompt = prompts::own_task_prompt(language);
    let reply = gemini
        .generate(&GenerateRequest::prompt(FLASH_LITE_001, &prompt, 0.7, 1024))
        .await?;

    Ok(normalize(
        "generate-tasks-own",
        &reply,
        |draft: TaskDraft| {
            (0..count)
                .map(|i| shape_task(&draft, task_id(Some(i)), Some(true)))
                .collect()
        },
        || vec![canned_own_task(language)],
    ))
}
