//! Sentence segmentation.

use std::sync::LazyLock;

use regex::Regex;

// A terminal mark followed by whitespace, or any line break run. The mark is
// part of the match so the split point is computed after it.
static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?。！？]\s+|[\r\n]+").expect("invalid sentence boundary regex"));

/// Splits `text` into trimmed, sentence-like segments.
///
/// A boundary is whitespace right after `.`, `!`, `?`, `。`, `！` or `？` (the
/// mark stays with the preceding segment), or any run of `\r`/`\n`. Blank
/// segments are dropped, so whitespace-only input yields nothing.
///
/// ```rust
/// use promptkit_core::split_sentences;
///
/// assert_eq!(
///     split_sentences("Hi there! How are you?\nFine."),
///     ["Hi there!", "How are you?", "Fine."]
/// );
/// assert!(split_sentences(" \n ").is_empty());
/// ```
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut start = 0;
    for boundary in BOUNDARY.find_iter(text) {
        let end = match boundary.as_str().chars().next() {
            Some(mark @ ('.' | '!' | '?' | '。' | '！' | '？')) => {
                boundary.start() + mark.len_utf8()
            }
            _ => boundary.start(),
        };
        push_trimmed(&mut segments, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut segments, &text[start..]);

    if segments.is_empty() {
        segments.push(text);
    }
    segments
}

fn push_trimmed<'a>(segments: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        segments.push(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_after_terminal_punctuation() {
        assert_eq!(
            split_sentences("Sentence one. Sentence two. Sentence three."),
            ["Sentence one.", "Sentence two.", "Sentence three."]
        );
    }

    #[test]
    fn punctuation_without_whitespace_does_not_split() {
        assert_eq!(split_sentences("Version 1.2.3 is out."), ["Version 1.2.3 is out."]);
        assert_eq!(split_sentences("Wait...what?"), ["Wait...what?"]);
    }

    #[test]
    fn repeated_marks_split_once() {
        assert_eq!(split_sentences("Really?! Yes.. Ok"), ["Really?!", "Yes..", "Ok"]);
    }

    #[test]
    fn newline_runs_split() {
        assert_eq!(
            split_sentences("title\r\n\r\nbody line\nlast"),
            ["title", "body line", "last"]
        );
    }

    #[test]
    fn cjk_punctuation_splits() {
        assert_eq!(split_sentences("你好。 世界！ 再见？ 好"), ["你好。", "世界！", "再见？", "好"]);
    }

    #[test]
    fn cjk_punctuation_without_space_stays_joined() {
        assert_eq!(split_sentences("你好。世界。"), ["你好。世界。"]);
    }

    #[test]
    fn whitespace_only_yields_nothing() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" \r\n\t ").is_empty());
    }

    #[test]
    fn segments_are_trimmed_and_non_empty() {
        for segment in split_sentences("  a.   b \n\n  c  !  d ") {
            assert!(!segment.is_empty());
            assert_eq!(segment, segment.trim());
        }
    }

    #[test]
    fn lone_mark_becomes_its_own_segment() {
        assert_eq!(split_sentences("x\n. y"), ["x", ".", "y"]);
    }
}
