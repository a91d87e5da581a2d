//! Character-budget summarisation by keeping the first and last sentences.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::truncate::take_chars;

// Terminal mark, whitespace, then an ASCII capital that opens the next sentence.
static SENTENCE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+[A-Z]").expect("invalid summary sentence regex"));

const ELLIPSIS: &str = " ... ";

/// Shortens `text` to at most `max_chars` characters.
///
/// Text within budget is returned unchanged. Otherwise the first and last
/// sentences are kept around an ellipsis, shrinking both when they do not fit.
///
/// # Errors
/// Returns [`Error::ZeroMaxChars`] when `max_chars` is zero.
///
/// ```rust
/// use promptkit_core::summarise_text;
///
/// let text = "First sentence. Second sentence. Third sentence. Fourth sentence.";
/// assert_eq!(summarise_text(text, 50).unwrap(), "First sentence. ... Fourth sentence.");
/// assert_eq!(summarise_text("Short text", 100).unwrap(), "Short text");
/// ```
pub fn summarise_text(text: &str, max_chars: usize) -> Result<String> {
    if max_chars == 0 {
        return Err(Error::ZeroMaxChars);
    }
    if text.chars().count() <= max_chars {
        return Ok(text.to_string());
    }

    let sentences = split_summary_sentences(text.trim());
    let (Some(first), Some(last)) = (sentences.first(), sentences.last()) else {
        return Ok(hard_cut(text, max_chars));
    };
    if sentences.len() == 1 {
        if max_chars < 10 {
            return Ok(take_chars(text, max_chars).to_string());
        }
        return Ok(hard_cut(text, max_chars));
    }

    let combined = format!("{first}{ELLIPSIS}{last}");
    if combined.chars().count() <= max_chars {
        return Ok(combined);
    }

    Ok(shrink_ends(first, last, max_chars).unwrap_or_else(|| hard_cut(text, max_chars)))
}

/// Keeps a head of `first` and a tail of `last`, each marked with `...`.
///
/// Returns `None` when the budget leaves no room for either end.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn shrink_ends(first: &str, last: &str, max_chars: usize) -> Option<String> {
    let ellipsis = ELLIPSIS.len() as isize;
    let max = max_chars as isize;
    let last_len = last.chars().count() as isize;

    let space_for_first = (max - ellipsis - last_len).div_euclid(2);
    let space_for_last = max - ellipsis - space_for_first;
    if space_for_first <= 0 || space_for_last <= 0 {
        return None;
    }

    let mut head = take_chars(first, (space_for_first - 3).max(0) as usize)
        .trim_end()
        .to_string();
    if !head.is_empty() && !head.ends_with('.') {
        head.push_str("...");
    }

    let skip = (last_len - space_for_last + 3).max(0) as usize;
    let tail = last.chars().skip(skip).collect::<String>();
    let mut tail = tail.trim_start().to_string();
    if !tail.is_empty() && last_len > space_for_last {
        tail.insert_str(0, "...");
    }

    Some(format!("{head} {tail}").trim().to_string())
}

fn hard_cut(text: &str, max_chars: usize) -> String {
    if max_chars <= 3 {
        return take_chars(text, max_chars).to_string();
    }
    format!("{}...", take_chars(text, max_chars - 3))
}

fn split_summary_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_START.find_iter(text) {
        // the mark is one byte and the capital is one byte
        sentences.push(&text[start..=boundary.start()]);
        start = boundary.end() - 1;
    }
    sentences.push(&text[start..]);
    sentences
}
