//! Token-budgeted chunking with overlap.
//!
//! Text is segmented into sentences, oversized sentences are broken on word
//! boundaries (or character windows for text without spaces), and the pieces
//! are packed greedily. When a chunk is emitted, its trailing pieces are
//! carried into the next one until they cover the requested overlap.
//!
//! `max_tokens` is a soft bound: a carried-over tail plus the next piece may
//! exceed it.

mod assembler;

use std::borrow::Cow;

use promptkit_models::ModelTable;

use crate::error::{Error, Result};
use crate::segment::split_sentences;
use crate::tokens::TokenEstimator;
use crate::types::{Chunk, Document};

use assembler::{ChunkAssembler, split_oversized};

/// Trait for document chunking strategies.
pub trait Chunker: Send + Sync {
    /// Splits a document into chunks.
    ///
    /// Chunk IDs are derived from the document ID as `{doc_id}#chunk_{n}`.
    fn chunk(&self, doc: &Document) -> Result<Vec<Chunk>>;

    /// Returns the name of this chunking strategy.
    fn name(&self) -> &'static str;
}

/// Validated chunk size and overlap, both in estimated tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    max_tokens: usize,
    overlap_tokens: usize,
}

impl TokenBudget {
    /// Creates a budget.
    ///
    /// # Errors
    /// [`Error::ZeroMaxTokens`] when `max_tokens` is zero and
    /// [`Error::OverlapTooLarge`] when `overlap_tokens >= max_tokens`.
    pub const fn new(max_tokens: usize, overlap_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::ZeroMaxTokens);
        }
        if overlap_tokens >= max_tokens {
            return Err(Error::OverlapTooLarge {
                overlap: overlap_tokens,
                max: max_tokens,
            });
        }
        Ok(Self {
            max_tokens,
            overlap_tokens,
        })
    }

    /// Target upper size of a chunk.
    #[must_use]
    pub const fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Tokens carried from the end of one chunk into the next.
    #[must_use]
    pub const fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }
}

/// Sentence-aware chunker bounded by estimated tokens.
///
/// # Example
///
/// ```rust
/// use promptkit_core::chunking::{Chunker, TokenBudget, TokenChunker};
/// use promptkit_core::{Document, TokenEstimator};
///
/// let budget = TokenBudget::new(8, 2).unwrap();
/// let chunker = TokenChunker::new(budget, TokenEstimator::default());
/// let doc = Document::new("doc1", "First sentence. Second sentence. Third sentence.");
/// let chunks = chunker.chunk(&doc).unwrap();
/// assert_eq!(chunks[0].id, "doc1#chunk_0");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenChunker {
    budget: TokenBudget,
    estimator: TokenEstimator,
}

impl TokenChunker {
    /// Creates a chunker from a validated budget and a resolved estimator.
    #[must_use]
    pub const fn new(budget: TokenBudget, estimator: TokenEstimator) -> Self {
        Self { budget, estimator }
    }

    /// Validates the arguments and resolves `model` against `table`.
    ///
    /// # Errors
    /// Returns an invalid-argument error for a zero `max_tokens`, an overlap
    /// that is not smaller than `max_tokens`, or a blank model, checked in
    /// that order.
    pub fn for_model(
        table: &ModelTable,
        max_tokens: usize,
        overlap_tokens: usize,
        model: &str,
    ) -> Result<Self> {
        let budget = TokenBudget::new(max_tokens, overlap_tokens)?;
        let estimator = TokenEstimator::for_model(table, model)?;
        Ok(Self::new(budget, estimator))
    }

    /// The budget this chunker packs against.
    #[must_use]
    pub const fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// The estimator used for every piece.
    #[must_use]
    pub const fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Splits `text` into chunk strings.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let max = self.budget.max_tokens();

        let mut pieces: Vec<Cow<'_, str>> = Vec::new();
        for sentence in split_sentences(text) {
            if self.estimator.estimate(sentence) <= max {
                pieces.push(Cow::Borrowed(sentence));
            } else {
                pieces.extend(split_oversized(sentence, max, &self.estimator));
            }
        }

        let piece_count = pieces.len();
        let mut assembler = ChunkAssembler::new(self.budget, &self.estimator);
        for piece in pieces {
            assembler.push(piece);
        }
        let chunks = assembler.finish();
        tracing::debug!(
            pieces = piece_count,
            chunks = chunks.len(),
            max_tokens = max,
            overlap_tokens = self.budget.overlap_tokens(),
            "split text into chunks"
        );
        chunks
    }
}

impl Chunker for TokenChunker {
    fn chunk(&self, doc: &Document) -> Result<Vec<Chunk>> {
        let chunks = self
            .split(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let token_count = self.estimator.estimate(&text);
                Chunk::from_document(doc, index, text, token_count)
            })
            .collect();
        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "token"
    }
}

/// Splits `text` into overlapping chunks of roughly `max_tokens` tokens.
///
/// # Errors
/// Returns an invalid-argument error for a zero `max_tokens`, an overlap that
/// is not smaller than `max_tokens`, or a blank model, checked in that order
/// and before any work.
///
/// ```rust
/// use promptkit_core::split_into_chunks;
///
/// let chunks = split_into_chunks("Sentence one. Sentence two. Sentence three.", 4, 2, "gpt-3.5-turbo").unwrap();
/// assert!(chunks[1].starts_with("Sentence one."));
/// assert!(split_into_chunks("text", 10, 10, "gpt-4o").is_err());
/// ```
pub fn split_into_chunks(
    text: &str,
    max_tokens: usize,
    overlap_tokens: usize,
    model: &str,
) -> Result<Vec<String>> {
    split_into_chunks_with(ModelTable::shared(), text, max_tokens, overlap_tokens, model)
}

/// Same as [`split_into_chunks`] against an explicit model table.
///
/// # Errors
/// See [`split_into_chunks`].
pub fn split_into_chunks_with(
    table: &ModelTable,
    text: &str,
    max_tokens: usize,
    overlap_tokens: usize,
    model: &str,
) -> Result<Vec<String>> {
    Ok(TokenChunker::for_model(table, max_tokens, overlap_tokens, model)?.split(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::content_hash;

    fn chunker(max: usize, overlap: usize) -> TokenChunker {
        TokenChunker::new(
            TokenBudget::new(max, overlap).unwrap(),
            TokenEstimator::with_ratio(4.0),
        )
    }

    #[test]
    fn budget_validation() {
        assert!(matches!(TokenBudget::new(0, 0), Err(Error::ZeroMaxTokens)));
        assert!(matches!(
            TokenBudget::new(10, 10),
            Err(Error::OverlapTooLarge { overlap: 10, max: 10 })
        ));
        let budget = TokenBudget::new(10, 9).unwrap();
        assert_eq!(budget.max_tokens(), 10);
        assert_eq!(budget.overlap_tokens(), 9);
    }

    #[test]
    fn validation_order() {
        let table = ModelTable::builtin();
        assert!(matches!(
            split_into_chunks_with(&table, "text", 0, 0, ""),
            Err(Error::ZeroMaxTokens)
        ));
        assert!(matches!(
            split_into_chunks_with(&table, "text", 5, 7, ""),
            Err(Error::OverlapTooLarge { .. })
        ));
        assert!(matches!(
            split_into_chunks_with(&table, "text", 5, 1, "  "),
            Err(Error::Model(_))
        ));
    }

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(chunker(10, 2).split("").is_empty());
        assert!(chunker(10, 2).split(" \n\t").is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunker(50, 5).split("  Just one line.  "), ["Just one line."]);
    }

    #[test]
    fn sentences_are_packed_greedily() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta.";
        // 3 + 3 + 4 tokens
        assert_eq!(
            chunker(6, 0).split(text),
            ["Alpha beta. Gamma delta.", "Epsilon zeta."]
        );
    }

    #[test]
    fn overlap_repeats_tail_of_previous_chunk() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta.";
        let chunks = chunker(6, 3).split(text);
        assert_eq!(chunks, ["Alpha beta. Gamma delta.", "Gamma delta. Epsilon zeta."]);
    }

    #[test]
    fn newlines_are_boundaries() {
        let text = "line one\nline two\nline three";
        assert_eq!(chunker(3, 0).split(text), ["line one", "line two", "line three"]);
    }

    #[test]
    fn long_sentence_is_split_on_words() {
        assert_eq!(
            chunker(2, 0).split("One two three four five six"),
            ["One two", "three", "four", "five six"]
        );
    }

    #[test]
    fn text_without_spaces_is_windowed() {
        let chunks = chunker(2, 0).split("你好世界你好世界你好");
        assert_eq!(chunks, ["你好世界你好世界", "你好"]);
    }

    #[test]
    fn document_chunks_carry_ids_and_metadata() {
        let mut doc = Document::new("guide", "Alpha beta. Gamma delta. Epsilon zeta.");
        doc.metadata.insert("source".into(), "unit".into());
        let chunks = chunker(6, 0).chunk(&doc).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "guide#chunk_0");
        assert_eq!(chunks[1].id, "guide#chunk_1");
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].source_id, "guide");
        assert_eq!(chunks[0].metadata["source"], "unit");
        assert_eq!(chunks[0].token_count, 6);
        assert_eq!(chunks[0].content_hash, content_hash(&chunks[0].text));
    }

    #[test]
    fn chunker_name() {
        assert_eq!(chunker(4, 0).name(), "token");
    }
}
