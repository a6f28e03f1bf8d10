// Language-assistant prompt templates.
// All prompts for the assistant module are defined here.

use crate::llm_client::template::fill;
use crate::models::language::{Language, QueryType};

const WORD_LIMIT: &str = "Be as precise as possible, please avoid writing more than 100 words!!!";

/// System instruction for the answer call, per query type.
pub fn answer_system(query_type: QueryType, language: Language) -> String {
    let lang = language.name();
    let body = match query_type {
        QueryType::Definition => format!(
            "You are a precise language assistant specialized in providing clear definitions in {lang}. \
             Format your response with markdown, focusing on the exact meaning, usage, and examples of the term."
        ),
        QueryType::Check => format!(
            "You are a language checker that identifies errors, awkward phrasings, and unnatural expressions \
             in {lang} text. Provide specific corrections and improvements. Format your response with markdown."
        ),
        QueryType::Ask => format!(
            "You are a language expert that answers specific questions about {lang} language usage, grammar, \
             vocabulary, and linguistics. Address the exact question directly and comprehensively. \
             Format your response with markdown."
        ),
    };
    format!("{body} {WORD_LIMIT}")
}

/// User prompt for the answer call. German lookups are asked in German.
pub fn answer_user(query: &str, query_type: QueryType, language: Language) -> String {
    let template = match (query_type, language) {
        (QueryType::Definition, Language::En) => {
            "Provide a precise, clear definition for: \"{query}\" in English. Include part of speech, \
             meaning, usage examples, and related forms if relevant."
        }
        (QueryType::Definition, Language::De) => {
            "Gib eine präzise, klare Definition für: \"{query}\" auf Deutsch. Füge Wortart, Bedeutung, \
             Verwendungsbeispiele und verwandte Formen an, wenn relevant."
        }
        (QueryType::Check, Language::En) => {
            "Check this phrase or sentence for correctness and naturalness: \"{query}\" in English. \
             Point out any errors, awkward phrasings, or unnatural expressions. Suggest improvements."
        }
        (QueryType::Check, Language::De) => {
            "Überprüfe diesen Satz oder diese Phrase auf Korrektheit und Natürlichkeit: \"{query}\" auf \
             Deutsch. Zeige Fehler, ungeschickte Formulierungen oder unnatürliche Ausdrücke auf. \
             Schlage Verbesserungen vor."
        }
        (QueryType::Ask, Language::En) => {
            "Answer this language-related question: \"{query}\" in English. Provide a comprehensive \
             explanation tailored specifically to this question."
        }
        (QueryType::Ask, Language::De) => {
            "Beantworte diese sprachbezogene Frage: \"{query}\" auf Deutsch. Gib eine umfassende \
             Erklärung, die speziell auf diese Frage zugeschnitten ist."
        }
    };
    fill(template, &[("query", query)])
}

pub const META_SYSTEM: &str = "You extract the key information from language queries and generate \
    helpful follow-up questions for language learners. Respond using valid JSON format only.";

const META_PROMPT_TEMPLATE: &str = r#"Based on this language query: "{query}" in {language}, provide:
1. A concise title that represents the main word, idiom, or expression being discussed (not the question itself)
2. Four relevant language learning follow-up questions. They should refer to the request and be related to language learning, grammar, usage, idioms, expressions, etc.

Return your response as a JSON object with these fields:
- "title": The main word, idiom, or expression (keep it short and focused)
- "suggestions": An array of exactly 4 relevant language learning follow-up questions"#;

pub fn meta_prompt(query: &str, language: Language) -> String {
    fill(
        META_PROMPT_TEMPLATE,
        &[("query", query), ("language", language.name())],
    )
}

pub fn tutor_system(language: Language) -> String {
    format!(
        "You are a helpful language tutor specializing in {} language. \
         Provide educational, clear, and comprehensive answers to language questions. \
         Format your response with markdown.",
        language.name()
    )
}
