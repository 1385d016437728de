//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EmbeddingError, Result};
use crate::store::ChunkRecord;

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors, or either vector has zero magnitude
/// - -1.0 means opposite vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Text of the matched chunk.
    pub text: String,

    /// Identifier of the matched chunk.
    pub chunk_id: usize,

    /// Cosine similarity with the query.
    pub score: f32,
}

/// Score every record against `query` and keep the best `top_k`.
///
/// Records whose vector length differs from the query's are skipped. Equal
/// scores keep their store order.
pub fn rank_top_k(query: &[f32], records: &[ChunkRecord], top_k: usize) -> Vec<SearchResult> {
    let mut scores: Vec<(OrderedFloat<f32>, &ChunkRecord)> = Vec::with_capacity(records.len());

    for record in records {
        match cosine_similarity(query, &record.embedding) {
            Ok(score) => scores.push((OrderedFloat(score), record)),
            Err(e) => warn!("Skipping chunk {} with invalid embedding: {e}", record.chunk_id),
        }
    }

    // Sort by score descending; stable
    scores.sort_by(|a, b| b.0.cmp(&a.0));

    scores
        .into_iter()
        .take(top_k)
        .map(|(score, record)| SearchResult {
            text: record.text.clone(),
            chunk_id: record.chunk_id,
            score: score.0,
        })
        .collect()
}
