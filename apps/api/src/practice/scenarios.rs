//! Discussion scenarios: a context line for a statement, and learner-authored
//! missions turned into a statement plus context.

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::gemini::FLASH_LITE_001;
use crate::llm_client::{GenerateRequest, GenerativeModel};
use crate::models::feedback::{CustomMission, DiscussionContext};
use crate::normalize::fields::{lenient, non_blank, text_or};
use crate::normalize::{normalize, Normalized};
use crate::practice::prompts;

pub const AGREE_DISAGREE: &str = "agreeDisagree";
pub const SITUATION_REACT: &str = "situationReact";

const FALLBACK_CONTEXTS: [&str; 4] = [
    "You're having a casual conversation with a friend over coffee.",
    "The topic comes up during a family dinner discussion.",
    "You're chatting with colleagues during your lunch break.",
    "You're at a social gathering and this topic comes up naturally.",
];

fn random_context() -> String {
    FALLBACK_CONTEXTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_CONTEXTS[0])
        .to_string()
}

/// Never fails: a failed or blank reply becomes one of the canned contexts.
pub async fn discussion_context(
    gemini: &dyn GenerativeModel,
    statement: &str,
) -> Normalized<DiscussionContext> {
    let request = GenerateRequest::prompt(FLASH_LITE_001, &prompts::context_prompt(statement), 0.8, 150);
    let reply = gemini.generate(&request).await;

    match reply.map(|text| non_blank(Some(text.trim().to_string()))) {
        Ok(Some(context)) => Normalized::fresh(DiscussionContext { context }),
        Ok(None) => Normalized::degraded(DiscussionContext {
            context: random_context(),
        }),
        Err(err) => {
            tracing::warn!(error = %err, "context generation failed, using canned context");
            Normalized::degraded(DiscussionContext {
                context: random_context(),
            })
        }
    }
}

/// What the learner asked a mission to be about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionData {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sub_type: Option<String>,
    pub question: Option<String>,
    pub situation: Option<String>,
    pub task: Option<String>,
    pub ai_notes: Option<String>,
}

impl MissionData {
    pub fn is_agree_disagree(&self) -> bool {
        self.sub_type.as_deref() == Some(AGREE_DISAGREE)
    }

    fn mission_type(&self) -> String {
        self.sub_type
            .clone()
            .unwrap_or_else(|| SITUATION_REACT.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MissionDraft {
    #[serde(default, deserialize_with = "lenient")]
    statement: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    context: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    mission_type: Option<String>,
}

fn shape_mission(draft: MissionDraft, data: &MissionData) -> CustomMission {
    let topic = non_blank(data.question.clone()).or_else(|| non_blank(data.situation.clone()));
    CustomMission {
        statement: text_or(draft.statement, topic.unwrap_or_else(|| "Default statement".into())),
        context: text_or(draft.context, "You are having a conversation about this topic."),
        mission_type: text_or(draft.mission_type, data.mission_type()),
    }
}

fn mission_unparsed(data: &MissionData) -> CustomMission {
    if data.is_agree_disagree() {
        CustomMission {
            statement: text_or(data.question.clone(), "This is a topic for discussion."),
            context: "You are having a discussion with friends about this topic.".into(),
            mission_type: AGREE_DISAGREE.into(),
        }
    } else {
        CustomMission {
            statement: format!(
                "Someone is telling you about: {}. You need to {}.",
                data.situation.as_deref().unwrap_or_default(),
                data.task.as_deref().unwrap_or_default()
            ),
            context: "A friend or colleague is talking to you about their situation.".into(),
            mission_type: SITUATION_REACT.into(),
        }
    }
}

pub async fn custom_mission(
    gemini: &dyn GenerativeModel,
    data: &MissionData,
) -> Result<Normalized<CustomMission>, AppError> {
    let request = GenerateRequest::prompt(FLASH_LITE_001, &prompts::mission_prompt(data), 0.8, 500);
    let reply = gemini.generate(&request).await?;

    Ok(normalize(
        "generate-custom-mission",
        &reply,
        |d| shape_mission(d, data),
        || mission_unparsed(data),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGemini;

    #[tokio::test]
    async fn test_context_is_trimmed() {
        let gemini = ScriptedGemini::new(vec![Ok("  You meet a neighbour in the lift.\n")]);
        let out = discussion_context(gemini.as_ref(), "Pets should be banned from flats").await;
        assert!(!out.degraded);
        assert_eq!(out.value.context, "You meet a neighbour in the lift.");
    }

    #[tokio::test]
    async fn test_context_failure_uses_canned_line() {
        let gemini = ScriptedGemini::new(vec![Err("timeout")]);
        let out = discussion_context(gemini.as_ref(), "s").await;
        assert!(out.degraded);
        assert!(FALLBACK_CONTEXTS.contains(&out.value.context.as_str()));
    }

    #[tokio::test]
    async fn test_mission_defaults_from_request() {
        let data = MissionData {
            sub_type: Some(AGREE_DISAGREE.into()),
            question: Some("Is remote work better?".into()),
            ..Default::default()
        };
        let gemini = ScriptedGemini::new(vec![Ok(r#"{"context": "At lunch."}"#)]);
        let out = custom_mission(gemini.as_ref(), &data).await.unwrap();
        assert_eq!(
            out.value,
            CustomMission {
                statement: "Is remote work better?".into(),
                context: "At lunch.".into(),
                mission_type: AGREE_DISAGREE.into(),
            }
        );
    }

    #[tokio::test]
    async fn test_mission_unparsed_situation() {
        let data = MissionData {
            sub_type: Some(SITUATION_REACT.into()),
            situation: Some("a friend failed an exam".into()),
            task: Some("encourage them".into()),
            ..Default::default()
        };
        let gemini = ScriptedGemini::new(vec![Ok("Here is your mission!")]);
        let out = custom_mission(gemini.as_ref(), &data).await.unwrap();
        assert!(out.degraded);
        assert_eq!(
            out.value.statement,
            "Someone is telling you about: a friend failed an exam. You need to encourage them."
        );
        assert_eq!(out.value.mission_type, SITUATION_REACT);
    }

    #[tokio::test]
    async fn test_mission_upstream_failure_is_error() {
        let gemini = ScriptedGemini::new(vec![Err("down")]);
        assert!(custom_mission(gemini.as_ref(), &MissionData::default())
            .await
            .is_err());
    }
}
