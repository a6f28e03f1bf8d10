use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

/// Fill `{name}` placeholders in one pass.
///
/// Substituted values are never re-scanned, so learner text that happens to
/// contain `{response}` reaches the model verbatim. Unknown placeholders are
/// left as they are.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let filled: Cow<'_, str> = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        vars.iter()
            .find(|(name, _)| *name == &caps[1])
            .map(|(_, value)| (*value).to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });
    filled.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_substitutes_every_occurrence() {
        let out = fill("{word} and {word} in {language}", &[("word", "Hund"), ("language", "German")]);
        assert_eq!(out, "Hund and Hund in German");
    }

    #[test]
    fn test_fill_does_not_rescan_inserted_values() {
        let out = fill(
            "A: {first} B: {second}",
            &[("first", "{second}"), ("second", "secret")],
        );
        assert_eq!(out, "A: {second} B: secret");
    }

    #[test]
    fn test_fill_keeps_unknown_placeholders_and_json_braces() {
        let out = fill("{\n  \"score\": {missing}\n}", &[("word", "x")]);
        assert_eq!(out, "{\n  \"score\": {missing}\n}");
    }
}
