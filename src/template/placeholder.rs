//! `{{params.<name>}}` placeholder substitution.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::types::Params;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{params\.([^{}]+?)\}\}").expect("placeholder pattern is valid")
});

/// Replace every `{{params.<name>}}` token with the named parameter's string form.
///
/// Substitution is a single left-to-right pass, so text introduced by one
/// parameter's value is never expanded again. Tokens naming a parameter absent
/// from `params` are left in place verbatim.
pub fn expand<'t>(text: &'t str, params: &Params) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| match params.get(&caps[1]) {
        Some(value) => value.to_param_string(),
        None => caps[0].to_string(),
    })
}

/// Names referenced by placeholders in `text`, in order of appearance.
pub fn referenced_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use serde_json::json;

    fn params(v: serde_json::Value) -> Params {
        match Value::from(v) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let p = params(json!({"lang": "French", "labels": ["a", "b"]}));
        assert_eq!(
            expand("to {{params.lang}}; again {{params.lang}}; {{params.labels}}", &p),
            "to French; again French; a, b"
        );
    }

    #[test]
    fn test_unknown_placeholder_stays_literal() {
        let p = params(json!({"text": "hi"}));
        assert_eq!(
            expand("{{params.text}} {{params.missing}}", &p),
            "hi {{params.missing}}"
        );
    }

    #[test]
    fn test_substituted_text_is_not_reexpanded() {
        let p = params(json!({"a": "{{params.b}}", "b": "boom"}));
        assert_eq!(expand("{{params.a}}", &p), "{{params.b}}");
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        let p = params(json!({"text": "ignored", "n": 3}));
        let input = "Return only the summary.\n{params.text} {{ params.text }}";
        let out = expand(input, &p);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, input);
    }

    #[test]
    fn test_referenced_names() {
        let names: Vec<_> = referenced_names("{{params.a}} and {{params.b_c}}").collect();
        assert_eq!(names, vec!["a", "b_c"]);
    }
}
