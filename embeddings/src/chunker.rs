//! Line-based document chunking.
//!
//! Every non-blank line of the source becomes one chunk. Identifiers are
//! positions in the filtered sequence, not source line numbers.

use serde::{Deserialize, Serialize};

/// A chunk of text extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position among the surviving chunks.
    pub id: usize,

    /// The trimmed line.
    pub text: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Split `content` into trimmed, non-empty line chunks.
pub fn split_lines(content: &str) -> Vec<Chunk> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(id, line)| Chunk::new(id, line))
        .collect()
}
