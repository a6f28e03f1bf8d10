use crate::assistant::chain::ProviderChain;
use crate::assistant::prompts::tutor_system;
use crate::errors::AppError;
use crate::llm_client::gemini::FLASH_LATEST;
use crate::llm_client::{ChatMessage, Content, GenerateRequest, GenerationConfig, GenerativeModel};
use crate::models::feedback::FollowUpAnswer;
use crate::models::language::LearnerSubmission;
use crate::normalize::Normalized;

pub const CHAIN_FAILURE_ANSWER: &str =
    "Sorry, there was an error with all available language models. Please try again later.";

/// Gemini has no system role: the tutor instruction goes first as a user
/// turn, then the history as alternating user/model turns.
pub fn gemini_conversation(submission: &LearnerSubmission) -> Vec<Content> {
    let system = tutor_system(submission.language);
    let mut contents = vec![Content::user(&[&system])];
    for turn in &submission.history {
        contents.push(Content::user(&[&turn.question]));
        contents.push(Content::model(&turn.answer));
    }
    contents.push(Content::user(&[&submission.learner_response]));
    contents
}

pub fn chat_conversation(submission: &LearnerSubmission) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(tutor_system(submission.language))];
    for turn in &submission.history {
        messages.push(ChatMessage::user(turn.question.clone()));
        messages.push(ChatMessage::assistant(turn.answer.clone()));
    }
    messages.push(ChatMessage::user(submission.learner_response.clone()));
    messages
}

pub async fn gemini_follow_up(
    gemini: &dyn GenerativeModel,
    submission: &LearnerSubmission,
) -> Result<FollowUpAnswer, AppError> {
    let request = GenerateRequest {
        model: FLASH_LATEST,
        contents: gemini_conversation(submission),
        config: GenerationConfig {
            temperature: 0.3,
            max_output_tokens: 1024,
        },
    };

    let answer = gemini.generate(&request).await.map_err(|e| {
        tracing::error!(error = %e, "Gemini follow-up failed");
        AppError::Llm("Failed to get response from Gemini API".to_string())
    })?;

    Ok(FollowUpAnswer {
        answer,
        model_used: "gemini".to_string(),
    })
}

pub async fn chain_follow_up(
    chain: &ProviderChain,
    submission: &LearnerSubmission,
) -> Normalized<FollowUpAnswer> {
    match chain
        .complete(&chat_conversation(submission), 0.7, 800, false)
        .await
    {
        Ok(a) => Normalized::fresh(FollowUpAnswer {
            answer: a.text,
            model_used: a.model_used.to_string(),
        }),
        Err(err) => {
            tracing::error!(error = %err, "every chat provider failed the follow-up");
            Normalized::degraded(FollowUpAnswer {
                answer: CHAIN_FAILURE_ANSWER.to_string(),
                model_used: "none".to_string(),
            })
        }
    }
}
