//! Locating a JSON object inside free-form completion text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// First fenced block whose body is a JSON object, with or without a `json` tag.
static FENCED_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("valid fence regex"));

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("completion was empty")]
    Empty,

    #[error("no JSON object found in completion")]
    NoJsonObject,

    #[error("JSON object did not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Finds the JSON object a model meant to return.
///
/// 1. the whole text, if it is an object
/// 2. a fence wrapping the whole text (closing fence optional, completions get cut off)
/// 3. the first fenced ```json { … } ``` block anywhere in the text
/// 4. the span from the first `{` to the last `}`
///
/// The first candidate that parses as an object wins.
pub fn extract_object(text: &str) -> Result<Map<String, Value>, DecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    if let Some(object) = parse_object(text) {
        return Ok(object);
    }

    let stripped = strip_json_fences(text);
    let fenced = FENCED_OBJECT
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    [Some(stripped), fenced, brace_span(text)]
        .into_iter()
        .flatten()
        .find_map(parse_object)
        .ok_or(DecodeError::NoJsonObject)
}

/// Extracts the object and decodes it into `T`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let object = extract_object(text)?;
    serde_json::from_value(Value::Object(object)).map_err(DecodeError::Shape)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_direct_object() {
        let object = extract_object(r#"{"isCorrect": true}"#).unwrap();
        assert_eq!(object["isCorrect"], true);
    }

    #[test]
    fn test_top_level_array_is_not_accepted_directly() {
        let err = extract_object(r#"[1, 2, 3]"#).unwrap_err();
        assert!(matches!(err, DecodeError::NoJsonObject));
    }

    #[test]
    fn test_fence_inside_prose() {
        let text = "Sure! Here is my analysis:\n```json\n{\"feedback\": \"Good\", \"nested\": {\"a\": 1}}\n```\nHope this helps.";
        let object = extract_object(text).unwrap();
        assert_eq!(object["feedback"], "Good");
        assert_eq!(object["nested"]["a"], 1);
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "```json\n{\"title\": \"Fernweh\"}";
        let object = extract_object(text).unwrap();
        assert_eq!(object["title"], "Fernweh");
    }

    #[test]
    fn test_brace_span_inside_prose() {
        let text = "The result is {\"score\": 80} as requested.";
        let object = extract_object(text).unwrap();
        assert_eq!(object["score"], 80);
    }

    #[test]
    fn test_unparseable_text() {
        let err = extract_object("I am unable to produce JSON today.").unwrap_err();
        assert!(matches!(err, DecodeError::NoJsonObject));
    }

    #[test]
    fn test_broken_braces() {
        let err = extract_object("{ this is { not json }").unwrap_err();
        assert!(matches!(err, DecodeError::NoJsonObject));
    }

    #[test]
    fn test_empty_completion() {
        assert!(matches!(extract_object("   \n"), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_fenced_and_plain_are_equivalent() {
        let plain = r#"{"isCorrect": false, "improvedSentence": "I went to school"}"#;
        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(extract_object(plain).unwrap(), extract_object(&fenced).unwrap());
    }

    #[test]
    fn test_decode_shape_error_is_descriptive() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            score: u32,
        }
        let err = decode::<Needs>(r#"{"score": "high"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Shape(_)));
        assert!(err.to_string().contains("expected shape"));
    }
}
