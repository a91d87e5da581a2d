//! Budget-bounded truncation.
//!
//! Truncation prefers the coarsest boundary that fits: whole sentences first,
//! then whole words, and characters only when a single word (or a script
//! written without spaces) is still too long.

use std::borrow::Cow;

use crate::error::Result;
use crate::segment::split_sentences;
use crate::tokens::TokenEstimator;

/// Returns the longest safe prefix of `segment` that fits `token_limit`.
///
/// ```rust
/// use std::borrow::Cow;
/// use promptkit_core::{TokenEstimator, truncate_segment};
///
/// let estimator = TokenEstimator::default();
/// assert_eq!(truncate_segment("Hello 世界 test message", 2, &estimator), "Hello 世界");
/// assert_eq!(truncate_segment("你好世界你好世界", 1, &estimator), "你好世界");
/// assert!(matches!(truncate_segment(" fits ", 5, &estimator), Cow::Borrowed("fits")));
/// ```
#[must_use]
pub fn truncate_segment<'a>(
    segment: &'a str,
    token_limit: usize,
    estimator: &TokenEstimator,
) -> Cow<'a, str> {
    let stripped = segment.trim();
    if token_limit == 0 || stripped.is_empty() {
        return Cow::Borrowed("");
    }

    let words: Vec<&str> = stripped.split_whitespace().collect();
    if words.len() > token_limit {
        return Cow::Owned(words[..token_limit].join(" "));
    }
    if words.len() > 1 && estimator.estimate(stripped) <= token_limit {
        return Cow::Borrowed(stripped);
    }

    Cow::Borrowed(take_chars(stripped, estimator.char_budget(token_limit)))
}

/// Truncates `text` to `max_tokens`, keeping whole sentences where possible.
///
/// # Errors
/// Returns an invalid-argument error when `model` is blank.
///
/// ```rust
/// use promptkit_core::truncate_to_token_budget;
///
/// let text = "The quick brown fox. It jumps over the lazy dog.";
/// assert_eq!(truncate_to_token_budget(text, 6, "gpt-4o").unwrap(), "The quick brown fox.");
/// assert_eq!(truncate_to_token_budget(text, 0, "gpt-4o").unwrap(), "");
/// ```
pub fn truncate_to_token_budget(text: &str, max_tokens: usize, model: &str) -> Result<String> {
    let estimator = TokenEstimator::shared(model)?;
    Ok(truncate_with(text, max_tokens, &estimator))
}

/// Same as [`truncate_to_token_budget`] with an already resolved estimator.
#[must_use]
pub fn truncate_with(text: &str, max_tokens: usize, estimator: &TokenEstimator) -> String {
    if max_tokens == 0 || text.trim().is_empty() {
        return String::new();
    }

    let mut kept: Vec<Cow<'_, str>> = Vec::new();
    let mut used = 0;
    for sentence in split_sentences(text) {
        let tokens = estimator.estimate(sentence);
        if tokens == 0 {
            continue;
        }
        if used + tokens <= max_tokens {
            kept.push(Cow::Borrowed(sentence));
            used += tokens;
            continue;
        }

        let partial = truncate_segment(sentence, max_tokens - used, estimator);
        if !partial.is_empty() {
            kept.push(partial);
        }
        break;
    }

    if kept.is_empty() {
        return truncate_segment(text, max_tokens, estimator).into_owned();
    }
    kept.join(" ")
}

/// Prefix of `text` holding at most `count` characters.
pub(crate) fn take_chars(text: &str, count: usize) -> &str {
    text.char_indices()
        .nth(count)
        .map_or(text, |(idx, _)| &text[..idx])
}
