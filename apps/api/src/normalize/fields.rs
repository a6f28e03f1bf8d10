//! Per-field coercion used when shaping a decoded draft into a response record.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a field as `Some(T)` when it has the right type and `None`
/// otherwise, so one malformed field never sinks the whole draft.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// The value if it holds visible text, the default otherwise.
pub fn text_or(value: Option<String>, default: impl Into<String>) -> String {
    non_blank(value).unwrap_or_else(|| default.into())
}

pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keeps a list the model returned (even an empty one). Builds the default
/// only when the field was missing or not a list.
pub fn list_or<F>(value: Option<Vec<String>>, default: F) -> Vec<String>
where
    F: FnOnce() -> Vec<String>,
{
    value.unwrap_or_else(default)
}

pub fn truncate(mut list: Vec<String>, max: usize) -> Vec<String> {
    list.truncate(max);
    list
}

/// Pads with `filler` up to `len` items, then truncates to `len`.
pub fn exactly<F>(mut list: Vec<String>, len: usize, filler: F) -> Vec<String>
where
    F: Fn(usize) -> String,
{
    while list.len() < len {
        list.push(filler(list.len()));
    }
    list.truncate(len);
    list
}

/// A positive score clamped into `min..=max`. Zero, negative and missing
/// scores take the default.
pub fn score_or(value: Option<f64>, default: u32, min: u32, max: u32) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => (v.round() as u32).clamp(min, max),
        _ => default,
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Draft {
        #[serde(default, deserialize_with = "lenient")]
        tips: Option<Vec<String>>,
        #[serde(default, deserialize_with = "lenient")]
        score: Option<f64>,
    }

    #[test]
    fn test_lenient_keeps_well_typed_fields() {
        let draft: Draft = serde_json::from_str(r#"{"tips": ["a"], "score": 80}"#).unwrap();
        assert_eq!(draft.tips, Some(vec!["a".to_string()]));
        assert_eq!(draft.score, Some(80.0));
    }

    #[test]
    fn test_lenient_drops_mistyped_fields() {
        let draft: Draft = serde_json::from_str(r#"{"tips": "use it often", "score": null}"#).unwrap();
        assert!(draft.tips.is_none());
        assert!(draft.score.is_none());
    }

    #[test]
    fn test_lenient_missing_fields() {
        let draft: Draft = serde_json::from_str("{}").unwrap();
        assert!(draft.tips.is_none());
    }

    #[test]
    fn test_text_or_treats_blank_as_missing() {
        assert_eq!(text_or(Some("  ".into()), "fallback"), "fallback");
        assert_eq!(text_or(Some("kept".into()), "fallback"), "kept");
        assert_eq!(text_or(None, "fallback"), "fallback");
    }

    #[test]
    fn test_list_or_keeps_empty_list() {
        let out = list_or(Some(vec![]), || strings(&["default"]));
        assert!(out.is_empty());
        let out = list_or(None, || strings(&["default"]));
        assert_eq!(out, vec!["default"]);
    }

    #[test]
    fn test_exactly_pads_and_truncates() {
        let padded = exactly(strings(&["a"]), 4, |i| format!("filler {i}"));
        assert_eq!(padded, vec!["a", "filler 1", "filler 2", "filler 3"]);

        let truncated = exactly(strings(&["a", "b", "c", "d", "e"]), 4, |_| "x".into());
        assert_eq!(truncated, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_score_or() {
        assert_eq!(score_or(Some(87.4), 75, 1, 100), 87);
        assert_eq!(score_or(Some(250.0), 75, 1, 100), 100);
        assert_eq!(score_or(Some(0.0), 75, 1, 100), 75);
        assert_eq!(score_or(None, 75, 1, 100), 75);
    }
}
