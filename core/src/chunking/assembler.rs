//! Greedy packing of pieces into overlapping chunks.

use std::borrow::Cow;

use crate::tokens::TokenEstimator;
use crate::truncate::take_chars;

use super::TokenBudget;

/// Accumulates pieces into chunks under a [`TokenBudget`].
///
/// Every pending piece carries its own estimate; pieces that estimate to zero
/// are never packed.
#[derive(Debug)]
pub(crate) struct ChunkAssembler<'a, 'e> {
    budget: TokenBudget,
    estimator: &'e TokenEstimator,
    pending: Vec<(Cow<'a, str>, usize)>,
    pending_tokens: usize,
    chunks: Vec<String>,
}

impl<'a, 'e> ChunkAssembler<'a, 'e> {
    pub(crate) const fn new(budget: TokenBudget, estimator: &'e TokenEstimator) -> Self {
        Self {
            budget,
            estimator,
            pending: Vec::new(),
            pending_tokens: 0,
            chunks: Vec::new(),
        }
    }

    /// Packs one piece, re-splitting it first when it alone exceeds the budget.
    pub(crate) fn push(&mut self, piece: Cow<'a, str>) {
        let tokens = self.estimator.estimate(&piece);
        if tokens == 0 {
            return;
        }
        let max = self.budget.max_tokens();
        if self.pending_tokens + tokens > max && !self.pending.is_empty() {
            self.flush(true);
        }

        if tokens <= max {
            self.pack(piece, tokens);
            return;
        }

        let smaller: Vec<String> = split_oversized(&piece, max, self.estimator)
            .into_iter()
            .map(Cow::into_owned)
            .collect();
        for small in smaller {
            let tokens = self.estimator.estimate(&small);
            if self.pending_tokens + tokens > max && !self.pending.is_empty() {
                self.flush(true);
            }
            self.pack(Cow::Owned(small), tokens);
            if self.pending_tokens >= max {
                self.flush(true);
            }
        }
    }

    fn pack(&mut self, piece: Cow<'a, str>, tokens: usize) {
        self.pending.push((piece, tokens));
        self.pending_tokens += tokens;
    }

    /// Emits the pending pieces as one chunk.
    ///
    /// With overlap, the trailing pieces whose estimates first reach
    /// `overlap_tokens` stay pending and seed the next chunk.
    pub(crate) fn flush(&mut self, with_overlap: bool) {
        if self.pending.is_empty() {
            return;
        }
        self.chunks.push(join_pieces(&self.pending));

        let overlap = self.budget.overlap_tokens();
        if with_overlap && overlap > 0 {
            let start = overlap_start(&self.pending, overlap);
            self.pending.drain(..start);
            self.pending_tokens = self.pending.iter().map(|(_, tokens)| tokens).sum();
        } else {
            self.pending.clear();
            self.pending_tokens = 0;
        }
        tracing::trace!(
            chunk = self.chunks.len(),
            carried = self.pending.len(),
            carried_tokens = self.pending_tokens,
            "flushed chunk"
        );
    }

    /// Flushes the remainder without overlap and returns every chunk.
    pub(crate) fn finish(mut self) -> Vec<String> {
        self.flush(false);
        self.chunks
    }
}

/// Index of the first piece in the overlap tail.
fn overlap_start(pieces: &[(Cow<'_, str>, usize)], target: usize) -> usize {
    let mut start = pieces.len();
    let mut carried = 0;
    for (idx, (_, tokens)) in pieces.iter().enumerate().rev() {
        start = idx;
        carried += tokens;
        if carried >= target {
            break;
        }
    }
    start
}

fn join_pieces(pieces: &[(Cow<'_, str>, usize)]) -> String {
    let mut chunk = String::new();
    for (piece, _) in pieces {
        if !chunk.is_empty() {
            chunk.push(' ');
        }
        chunk.push_str(piece);
    }
    chunk
}

/// Splits a segment that exceeds `max_tokens` into pieces that fit.
///
/// Words are accumulated while the joined candidate still fits; a segment that
/// is one indivisible word is cut into character windows instead.
pub(crate) fn split_oversized<'s>(
    segment: &'s str,
    max_tokens: usize,
    estimator: &TokenEstimator,
) -> Vec<Cow<'s, str>> {
    let stripped = segment.trim();
    if stripped.is_empty() {
        return Vec::new();
    }

    let mut words = stripped.split_whitespace().peekable();
    let Some(first) = words.next() else {
        return Vec::new();
    };
    if words.peek().is_none() {
        return char_windows(first, estimator.char_budget(max_tokens))
            .into_iter()
            .map(Cow::Borrowed)
            .collect();
    }

    let mut pieces = Vec::new();
    let mut current = first.to_string();
    for word in words {
        let accepted = current.len();
        current.push(' ');
        current.push_str(word);
        if estimator.estimate(&current) > max_tokens {
            current.truncate(accepted);
            pieces.push(Cow::Owned(std::mem::take(&mut current)));
            current.push_str(word);
        }
    }
    pieces.push(Cow::Owned(current));
    pieces
}

fn char_windows(text: &str, size: usize) -> Vec<&str> {
    let mut windows = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let window = take_chars(rest, size);
        windows.push(window);
        rest = &rest[window.len()..];
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> TokenEstimator {
        TokenEstimator::with_ratio(4.0)
    }

    fn budget(max: usize, overlap: usize) -> TokenBudget {
        TokenBudget::new(max, overlap).unwrap()
    }

    #[test]
    fn word_groups_stay_within_budget() {
        let pieces = split_oversized("aa bb cc dd ee", 2, &estimator());
        assert_eq!(pieces, ["aa bb", "cc dd", "ee"]);
    }

    #[test]
    fn candidate_is_estimated_as_joined_text() {
        // "abcdefgh ij" is 11 chars -> 3 tokens, so "ij" starts a new piece
        let pieces = split_oversized("abcdefgh ij kl", 2, &estimator());
        assert_eq!(pieces, ["abcdefgh", "ij kl"]);
    }

    #[test]
    fn single_word_is_cut_into_windows() {
        let pieces = split_oversized("abcdefghijklmnopqrst", 2, &estimator());
        assert_eq!(pieces, ["abcdefgh", "ijklmnop", "qrst"]);
    }

    #[test]
    fn windows_never_split_code_points() {
        let windows = char_windows("你好世界你好世界你", 4);
        assert_eq!(windows, ["你好世界", "你好世界", "你"]);
    }

    #[test]
    fn overlap_prefers_most_recent_pieces() {
        let pieces = vec![
            (Cow::Borrowed("a"), 3),
            (Cow::Borrowed("b"), 1),
            (Cow::Borrowed("c"), 1),
        ];
        assert_eq!(overlap_start(&pieces, 2), 1);
        assert_eq!(overlap_start(&pieces, 1), 2);
        // the walk stops once the target is reached, even if overshooting
        assert_eq!(overlap_start(&pieces, 4), 0);
    }

    #[test]
    fn flush_without_overlap_clears_state() {
        let estimator = estimator();
        let mut assembler = ChunkAssembler::new(budget(10, 0), &estimator);
        assembler.push(Cow::Borrowed("one two"));
        assembler.flush(true);
        assert!(assembler.pending.is_empty());
        assert_eq!(assembler.pending_tokens, 0);
        assert_eq!(assembler.finish(), ["one two"]);
    }

    #[test]
    fn flush_with_overlap_seeds_next_chunk() {
        let estimator = estimator();
        let mut assembler = ChunkAssembler::new(budget(4, 2), &estimator);
        assembler.push(Cow::Borrowed("aa bb"));
        assembler.push(Cow::Borrowed("cc dd"));
        assembler.push(Cow::Borrowed("ee ff"));
        assert_eq!(assembler.finish(), ["aa bb cc dd", "cc dd ee ff"]);
    }

    #[test]
    fn zero_token_pieces_are_ignored() {
        let estimator = estimator();
        let mut assembler = ChunkAssembler::new(budget(4, 0), &estimator);
        assembler.push(Cow::Borrowed("   "));
        assert!(assembler.finish().is_empty());
    }

    #[test]
    fn oversized_piece_flushes_eagerly() {
        let estimator = estimator();
        let mut assembler = ChunkAssembler::new(budget(2, 0), &estimator);
        assembler.push(Cow::Borrowed("abcdefghijklmnopqrst"));
        assert_eq!(assembler.finish(), ["abcdefgh", "ijklmnop", "qrst"]);
    }
}
