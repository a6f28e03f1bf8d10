//! Word lookup: an answer call followed by a metadata call (title + four
//! follow-up suggestions).

use serde::Deserialize;

use crate::assistant::chain::ProviderChain;
use crate::assistant::prompts;
use crate::errors::AppError;
use crate::llm_client::gemini::{FLASH_LATEST, FLASH_LITE};
use crate::llm_client::{ChatMessage, Content, GenerateRequest, GenerationConfig, GenerativeModel};
use crate::models::feedback::LanguageAssistance;
use crate::models::language::{Language, QueryType};
use crate::normalize::fields::{exactly, lenient, list_or, text_or};
use crate::normalize::{normalize, normalize_absorbing, Normalized};

const SUGGESTION_COUNT: usize = 4;
const TITLE_MAX_CHARS: usize = 30;

pub const CHAIN_FAILURE_ANSWER: &str = "Sorry, there was an error processing your request.";

#[derive(Debug, Deserialize)]
struct MetaDraft {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupMeta {
    pub title: String,
    pub suggestions: Vec<String>,
}

/// First three words of the query, capped at 30 characters.
pub fn title_from_query(query: &str) -> String {
    let title = query.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
    if title.chars().count() > TITLE_MAX_CHARS {
        let cut: String = title.chars().take(TITLE_MAX_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        title
    }
}

pub fn default_suggestions(query: &str, language: Language) -> Vec<String> {
    let short = if query.chars().count() > 20 {
        format!("{}...", query.chars().take(20).collect::<String>())
    } else {
        query.to_string()
    };

    match language {
        Language::De => vec![
            format!("Wie verwendet man \"{short}\" in einem Satz?"),
            format!("Was sind Synonyme für \"{short}\"?"),
            format!("Was ist der Ursprung von \"{short}\"?"),
            format!("Gibt es Redewendungen mit \"{short}\"?"),
        ],
        Language::En => vec![
            format!("How do you use \"{short}\" in a sentence?"),
            format!("What are synonyms for \"{short}\"?"),
            format!("What is the origin of \"{short}\"?"),
            format!("Are there idioms with \"{short}\"?"),
        ],
    }
}

fn finish(title: String, suggestions: Vec<String>) -> LookupMeta {
    let suggestions = exactly(suggestions, SUGGESTION_COUNT, |_| {
        format!("Tell me more about {title}")
    });
    LookupMeta { title, suggestions }
}

fn shape_meta(draft: MetaDraft, query: &str, language: Language) -> LookupMeta {
    let title = text_or(draft.title, title_from_query(query));
    let suggestions = list_or(draft.suggestions, || default_suggestions(query, language));
    finish(title, suggestions)
}

fn fallback_meta(query: &str, language: Language) -> LookupMeta {
    finish(title_from_query(query), default_suggestions(query, language))
}

/// Gemini lookup. Either upstream call failing fails the request; an
/// undecodable metadata reply degrades to the query-derived metadata.
pub async fn gemini_lookup(
    gemini: &dyn GenerativeModel,
    query: &str,
    language: Language,
    query_type: QueryType,
) -> Result<Normalized<LanguageAssistance>, AppError> {
    let system = prompts::answer_system(query_type, language);
    let user = prompts::answer_user(query, query_type, language);
    let answer_request = GenerateRequest {
        model: FLASH_LITE,
        contents: vec![Content::user(&[&system, &user])],
        config: GenerationConfig {
            temperature: 0.2,
            max_output_tokens: 1024,
        },
    };
    let answer = gemini
        .generate(&answer_request)
        .await
        .map_err(|e| AppError::Llm(format!("Gemini API error (answer): {e}")))?;

    let meta_request = GenerateRequest::prompt(
        FLASH_LATEST,
        &prompts::meta_prompt(query, language),
        0.2,
        512,
    );
    let meta_text = gemini
        .generate(&meta_request)
        .await
        .map_err(|e| AppError::Llm(format!("Gemini API error (meta): {e}")))?;

    let meta = normalize(
        "gemini-language.meta",
        &meta_text,
        |d| shape_meta(d, query, language),
        || fallback_meta(query, language),
    );

    Ok(meta.map(|m| LanguageAssistance {
        title: m.title,
        answer,
        suggestions: m.suggestions,
        model_used: "gemini".to_string(),
    }))
}

/// Lookup over the provider chain. Never fails: an exhausted chain yields the
/// apology answer with `modelUsed: "none"`.
pub async fn chain_lookup(
    chain: &ProviderChain,
    query: &str,
    language: Language,
    query_type: QueryType,
) -> Normalized<LanguageAssistance> {
    let answer_messages = vec![
        ChatMessage::system(prompts::answer_system(query_type, language)),
        ChatMessage::user(prompts::answer_user(query, query_type, language)),
    ];
    let (answer, model_used, answer_failed) =
        match chain.complete(&answer_messages, 0.5, 600, false).await {
            Ok(a) => (a.text, a.model_used, false),
            Err(err) => {
                tracing::error!(error = %err, "every chat provider failed the lookup answer");
                (CHAIN_FAILURE_ANSWER.to_string(), "none", true)
            }
        };

    let meta_messages = vec![
        ChatMessage::system(prompts::META_SYSTEM),
        ChatMessage::user(prompts::meta_prompt(query, language)),
    ];
    let meta_reply = chain
        .complete(&meta_messages, 0.4, 350, true)
        .await
        .map(|a| a.text);
    let meta = normalize_absorbing(
        "meaning.meta",
        meta_reply,
        |d| shape_meta(d, query, language),
        || fallback_meta(query, language),
        || fallback_meta(query, language),
    );

    let degraded = answer_failed || meta.degraded;
    let record = LanguageAssistance {
        title: meta.value.title,
        answer,
        suggestions: meta.value.suggestions,
        model_used: model_used.to_string(),
    };
    if degraded {
        Normalized::degraded(record)
    } else {
        Normalized::fresh(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::chain::ChainLink;
    use crate::llm_client::testing::{ScriptedChat, ScriptedGemini};
    use crate::llm_client::ChatTarget;

    #[test]
    fn test_title_from_query() {
        assert_eq!(title_from_query("what does serendipity mean"), "what does serendipity");
        assert_eq!(title_from_query("  Fernweh "), "Fernweh");
        let long = title_from_query("Donaudampfschifffahrtsgesellschaftskapitän ist lang");
        assert_eq!(long.chars().count(), 30);
        assert!(long.ends_with("..."));
    }

    #[test]
    fn test_default_suggestions_follow_language() {
        let de = default_suggestions("Fernweh", Language::De);
        assert_eq!(de.len(), 4);
        assert!(de[0].starts_with("Wie verwendet man"));
        let en = default_suggestions("a very long expression to shorten", Language::En);
        assert!(en[1].contains("\"a very long expressi...\""));
    }

    #[test]
    fn test_meta_pads_to_four() {
        let draft = MetaDraft {
            title: Some("Serendipity".into()),
            suggestions: Some(vec!["Only one?".into()]),
        };
        let meta = shape_meta(draft, "serendipity", Language::En);
        assert_eq!(meta.suggestions.len(), 4);
        assert_eq!(meta.suggestions[0], "Only one?");
        assert_eq!(meta.suggestions[3], "Tell me more about Serendipity");
    }

    #[test]
    fn test_meta_truncates_to_four() {
        let draft = MetaDraft {
            title: None,
            suggestions: Some((1..=6).map(|i| format!("q{i}")).collect()),
        };
        let meta = shape_meta(draft, "break a leg now", Language::En);
        assert_eq!(meta.title, "break a leg");
        assert_eq!(meta.suggestions, vec!["q1", "q2", "q3", "q4"]);
    }

    #[tokio::test]
    async fn test_gemini_lookup_makes_two_calls() {
        let gemini = ScriptedGemini::new(vec![
            Ok("**Fernweh** is a longing for far-off places."),
            Ok("```json\n{\"title\": \"Fernweh\", \"suggestions\": [\"a\", \"b\", \"c\", \"d\"]}\n```"),
        ]);
        let out = gemini_lookup(gemini.as_ref(), "Fernweh", Language::De, QueryType::Definition)
            .await
            .unwrap();

        assert!(!out.degraded);
        assert_eq!(out.value.title, "Fernweh");
        assert_eq!(out.value.model_used, "gemini");
        assert_eq!(out.value.suggestions.len(), 4);

        let requests = gemini.requests.lock().unwrap();
        assert_eq!(requests[0].model, FLASH_LITE);
        assert_eq!(requests[0].contents[0].parts.len(), 2);
        assert_eq!(requests[1].model, FLASH_LATEST);
        assert_eq!(requests[1].config.max_output_tokens, 512);
    }

    #[tokio::test]
    async fn test_gemini_lookup_upstream_failure_is_error() {
        let gemini = ScriptedGemini::new(vec![Err("quota")]);
        let err = gemini_lookup(gemini.as_ref(), "x", Language::En, QueryType::Ask)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Gemini API error (answer)"));
    }

    #[tokio::test]
    async fn test_chain_lookup_exhausted_chain() {
        let chat = ScriptedChat::new("Mistral", vec![]);
        let chain = ProviderChain::new(vec![ChainLink {
            label: "mistral",
            client: chat,
            target: ChatTarget::Model("m".into()),
        }]);

        let out = chain_lookup(&chain, "serendipity", Language::En, QueryType::Definition).await;
        assert!(out.degraded);
        assert_eq!(out.value.answer, CHAIN_FAILURE_ANSWER);
        assert_eq!(out.value.model_used, "none");
        assert_eq!(out.value.title, "serendipity");
        assert_eq!(out.value.suggestions.len(), 4);
    }
}
