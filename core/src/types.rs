//! Document and chunk records for pipeline use.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dedup::content_hash;

/// Key/value metadata attached to documents and chunks.
pub type Metadata = BTreeMap<String, String>;

/// A document to be chunked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier for the document.
    pub id: String,
    /// Raw text content.
    pub text: String,
    /// Arbitrary metadata, copied onto every chunk.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Creates a new document with empty metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_metadata(id, text, Metadata::new())
    }

    /// Creates a new document with metadata.
    #[must_use]
    pub fn with_metadata(
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
        }
    }
}

/// A chunk of text derived from a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk (format: `{doc_id}#chunk_{n}`).
    pub id: String,
    /// Text content of the chunk.
    pub text: String,
    /// Parent document ID.
    pub source_id: String,
    /// Index of this chunk within the document.
    pub index: usize,
    /// Estimated token count of `text`.
    pub token_count: usize,
    /// Content hash for deduplication.
    pub content_hash: u64,
    /// Metadata inherited from the document.
    pub metadata: Metadata,
}

impl Chunk {
    /// Creates the `index`-th chunk of `doc`.
    #[must_use]
    pub fn from_document(doc: &Document, index: usize, text: String, token_count: usize) -> Self {
        Self {
            id: format!("{}#chunk_{index}", doc.id),
            content_hash: content_hash(&text),
            text,
            source_id: doc.id.clone(),
            index,
            token_count,
            metadata: doc.metadata.clone(),
        }
    }
}
