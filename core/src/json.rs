//! Lenient JSON extraction from model output.
//!
//! Models wrap JSON in prose, Markdown fences or inline code. Extraction tries,
//! in order: the whole text, fenced and inline code, balanced `{…}`/`[…]`
//! spans (one nesting level deep), then the widest brace or bracket span.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static CODE_BLOCKS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("invalid json fence regex"),
        Regex::new(r"(?s)```\s*(.*?)\s*```").expect("invalid fence regex"),
        Regex::new(r"(?s)`(.*?)`").expect("invalid inline code regex"),
    ]
});

static BALANCED: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").expect("invalid object regex"),
        Regex::new(r"\[[^\[\]]*(?:\[[^\[\]]*\][^\[\]]*)*\]").expect("invalid array regex"),
    ]
});

/// Extracts the first JSON value found in `text`.
///
/// ```rust
/// use promptkit_core::safe_extract_json;
/// use serde_json::json;
///
/// let reply = r#"Here is the data: {"name": "John", "age": 30}"#;
/// assert_eq!(safe_extract_json(reply), Some(json!({"name": "John", "age": 30})));
/// assert_eq!(safe_extract_json("```json\n{\"key\": \"value\"}\n```"), Some(json!({"key": "value"})));
/// assert_eq!(safe_extract_json("Error: invalid input"), None);
/// ```
#[must_use]
pub fn safe_extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    for pattern in CODE_BLOCKS.iter() {
        let found = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|inner| parse(inner.as_str().trim()));
        if found.is_some() {
            return found;
        }
    }

    for pattern in BALANCED.iter() {
        if let Some(value) = pattern.find_iter(text).find_map(|m| parse(m.as_str())) {
            return Some(value);
        }
    }

    widest_span(text, '{', '}').or_else(|| widest_span(text, '[', ']'))
}

/// Extracts every JSON value found in `text`.
///
/// Text that parses as a whole yields that single value. Otherwise values in
/// code fences are collected, falling back to balanced spans and finally to
/// [`safe_extract_json`].
///
/// ```rust
/// use promptkit_core::extract_all_json;
/// use serde_json::json;
///
/// let reply = r#"First: {"a": 1} Second: {"b": 2}"#;
/// assert_eq!(extract_all_json(reply), [json!({"a": 1}), json!({"b": 2})]);
/// ```
#[must_use]
pub fn extract_all_json(text: &str) -> Vec<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return vec![value];
    }

    for pattern in CODE_BLOCKS.iter() {
        let found: Vec<Value> = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|inner| parse(inner.as_str().trim()))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }

    let found: Vec<Value> = BALANCED
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .filter_map(|m| parse(m.as_str()))
        .collect();
    if !found.is_empty() {
        return found;
    }

    safe_extract_json(text).into_iter().collect()
}

fn widest_span(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    parse(&text[start..=end])
}

fn parse(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate).ok()
}
