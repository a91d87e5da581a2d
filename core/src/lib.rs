//! # promptkit-core
//!
//! Token budgeting and chunking for text sent to large language models.
//!
//! Nothing here runs a tokenizer. Token counts are estimated from word counts
//! and a per-model characters-per-token ratio (see [`promptkit_models`]), which
//! is cheap, deterministic and good enough to keep prompts inside a context
//! window.
//!
//! | Operation | Function |
//! |-----------|----------|
//! | Estimate tokens | [`estimate_tokens`], [`TokenEstimator`] |
//! | Split sentences | [`split_sentences`] |
//! | Truncate to a budget | [`truncate_to_token_budget`], [`truncate_segment`] |
//! | Overlapping chunks | [`split_into_chunks`], [`chunking::TokenChunker`] |
//! | Normalize whitespace | [`clean_text`], [`merge_context_snippets`] |
//! | Summarise by characters | [`summarise_text`] |
//! | Estimate request cost | [`estimate_llm_cost`] |
//! | Pull JSON out of replies | [`safe_extract_json`], [`extract_all_json`] |
//!
//! ```rust
//! use promptkit_core::{estimate_tokens, split_into_chunks, truncate_to_token_budget};
//!
//! let text = "Sentence one. Sentence two. Sentence three.";
//! assert_eq!(estimate_tokens(text, "gpt-3.5-turbo").unwrap(), 11);
//!
//! let short = truncate_to_token_budget(text, 8, "gpt-3.5-turbo").unwrap();
//! assert_eq!(short, "Sentence one. Sentence two.");
//!
//! let chunks = split_into_chunks(text, 4, 2, "gpt-3.5-turbo").unwrap();
//! assert_eq!(chunks.len(), 3);
//! ```
//!
//! Every function is pure and safe to call from many threads at once. The
//! only shared state is the lazily built [`ModelTable::shared`] table.

pub mod chunking;
mod cleaning;
mod cost;
pub mod dedup;
mod error;
mod json;
mod provider;
mod segment;
mod summarise;
mod tokens;
mod truncate;
mod types;

#[doc(inline)]
pub use chunking::{Chunker, TokenBudget, TokenChunker, split_into_chunks, split_into_chunks_with};
pub use cleaning::{DEFAULT_SNIPPET_SEPARATOR, clean_text, merge_context_snippets};
pub use cost::{
    CostEstimate, DEFAULT_COMPLETION_RATIO, estimate_cost, estimate_llm_cost,
    estimate_llm_cost_with,
};
pub use error::{Error, Result};
pub use json::{extract_all_json, safe_extract_json};
pub use promptkit_models::{self as models, ModelTable, Pricing};
pub use provider::CompletionProvider;
pub use segment::split_sentences;
pub use summarise::summarise_text;
pub use tokens::{TokenEstimator, estimate_tokens};
pub use truncate::{truncate_segment, truncate_to_token_budget, truncate_with};
pub use types::{Chunk, Document, Metadata};
