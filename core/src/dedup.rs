//! Content hashing for chunk deduplication.

use xxhash_rust::xxh3::xxh3_64;

/// Computes the xxh3-64 hash of `text`.
#[must_use]
pub fn content_hash(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// Drops chunks whose text hash was already seen, keeping first occurrences.
///
/// Overlapping splits of repetitive text can emit identical chunks.
#[must_use]
pub fn dedup_chunks(chunks: Vec<crate::Chunk>) -> Vec<crate::Chunk> {
    let mut seen = std::collections::HashSet::new();
    chunks
        .into_iter()
        .filter(|chunk| seen.insert(chunk.content_hash))
        .collect()
}
