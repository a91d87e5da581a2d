//! # promptkit
//!
//! Façade crate that re-exports everything from [`promptkit_core`]. Pull this crate into
//! your binary to estimate tokens, cut text into overlapping chunks and price requests
//! before they reach an LLM API.
//!
//! ## What's inside?
//!
//! - [`estimate_tokens`] and [`TokenEstimator`] for heuristic token counts per model family.
//! - [`truncate_to_token_budget`] and [`split_into_chunks`] for sentence-aware budgeting.
//! - [`estimate_llm_cost`] backed by a [`ModelTable`] you can extend from a TOML or JSON file.
//! - [`safe_extract_json`] for pulling structured data out of model replies.
//! - With the `openai` feature, a blocking chat-completions client under [`openai`].
//!
//! ## Example
//!
//! ```rust
//! use promptkit::{TokenChunker, Chunker, Document, ModelTable};
//!
//! let chunker = TokenChunker::for_model(ModelTable::shared(), 8, 0, "gpt-3.5-turbo").unwrap();
//! let doc = Document::new("notes", "Sentence one. Sentence two. Sentence three.");
//! let chunks = chunker.chunk(&doc).unwrap();
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].id, "notes#chunk_0");
//! assert_eq!(chunks[1].text, "Sentence three.");
//! ```

pub use promptkit_core::*;

#[cfg(feature = "openai")]
#[doc(inline)]
pub use promptkit_openai as openai;
