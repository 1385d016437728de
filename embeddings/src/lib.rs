//! # Embeddings
//!
//! Semantic search over a single source document for the Winston agent's
//! encyclopedia tool.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors through Amazon
//!   Bedrock's Titan Text Embeddings V2
//! - **Vector Store**: Ordered in-memory records persisted as a JSON snapshot
//! - **Parallel Build**: Line chunking with a bounded pool of embedding workers
//! - **Similarity Search**: Linear cosine-similarity scan with stable ranking
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  source ──► split_lines ──► ParallelEmbedder ──► VectorStore    │
//! │                                   │                  │          │
//! │                                   ▼                  ▼          │
//! │                       Embedder ◄── EmbeddingProvider  snapshot  │
//! │                           │                                     │
//! │                           ▼                                     │
//! │               VectorIndex::search ──► rank_top_k                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod builder;
pub mod chunker;
pub mod config;
pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{BuildSummary, ParallelEmbedder};
pub use chunker::{Chunk, split_lines};
pub use config::{ProviderConfig, VectorSearchConfig};
pub use error::{EmbeddingError, Result};
pub use index::{LoadOutcome, SearchOutcome, VectorIndex};
pub use provider::{Embedder, EmbeddingProvider, EmbeddingRequest, TitanProvider};
pub use similarity::{SearchResult, cosine_similarity, rank_top_k};
pub use store::{ChunkRecord, VectorStore};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (Titan V2 also supports 512 and 256).
pub const DEFAULT_DIMENSION: usize = 1024;

/// Upper bound on the number of results a single search may return.
pub const MAX_TOP_K: usize = 25;
