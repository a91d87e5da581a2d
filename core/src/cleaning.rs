//! Whitespace normalization and snippet merging.

/// Separator used by [`merge_context_snippets`] callers that have no preference.
pub const DEFAULT_SNIPPET_SEPARATOR: &str = "\n\n";

/// Collapses every whitespace run to a single space and trims the ends.
///
/// ```rust
/// use promptkit_core::clean_text;
///
/// assert_eq!(clean_text("  Hello   World!  "), "Hello World!");
/// assert_eq!(clean_text("Multiple\n\nlines\n\nhere"), "Multiple lines here");
/// ```
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Joins the non-blank snippets, each trimmed, with `separator`.
///
/// ```rust
/// use promptkit_core::{DEFAULT_SNIPPET_SEPARATOR, merge_context_snippets};
///
/// assert_eq!(
///     merge_context_snippets(["First snippet", "Second snippet"], DEFAULT_SNIPPET_SEPARATOR),
///     "First snippet\n\nSecond snippet"
/// );
/// assert_eq!(merge_context_snippets(["Hello", "", "World"], " | "), "Hello | World");
/// ```
#[must_use]
pub fn merge_context_snippets<I, S>(snippets: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    let mut first = true;
    for snippet in snippets {
        let snippet = snippet.as_ref().trim();
        if snippet.is_empty() {
            continue;
        }
        if !first {
            out.push_str(separator);
        }
        out.push_str(snippet);
        first = false;
    }
    out
}
