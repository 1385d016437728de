//! The vector index: store, embedder and configuration behind one handle.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::MAX_TOP_K;
use crate::builder::{BuildSummary, ParallelEmbedder};
use crate::config::VectorSearchConfig;
use crate::error::{EmbeddingError, Result};
use crate::provider::{Embedder, EmbeddingProvider, TitanProvider};
use crate::similarity::{SearchResult, rank_top_k};
use crate::store::VectorStore;

/// How `load_or_build` populated the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Restored from the snapshot.
    LoadedFromCache { total_entries: usize },

    /// Built from the source document.
    Rebuilt(BuildSummary),
}

/// Result of a search that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Ranked hits, best first.
    Matches(Vec<SearchResult>),

    /// Nothing to return, with the reason.
    NoData(String),
}

/// Semantic index over one source document.
///
/// Constructed empty, populated by one build or snapshot load, then queried
/// any number of times. Searches and builds exclude each other.
pub struct VectorIndex {
    config: VectorSearchConfig,
    embedder: Embedder,
    store: VectorStore,
    rebuild_gate: RwLock<()>,
}

impl VectorIndex {
    /// Create an index that embeds through `provider`.
    pub fn new(config: VectorSearchConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        config.validate()?;

        let mut embedder = Embedder::new(provider, config.dimension);
        if !config.normalize {
            embedder = embedder.without_normalization();
        }

        Ok(Self {
            config,
            embedder,
            store: VectorStore::new(),
            rebuild_gate: RwLock::new(()),
        })
    }

    /// Create an index backed by Bedrock Titan as configured.
    pub fn from_config(config: VectorSearchConfig) -> Result<Self> {
        let provider = TitanProvider::from_config(&config.provider)?;
        Self::new(config, Arc::new(provider))
    }

    /// The configuration in use.
    pub fn config(&self) -> &VectorSearchConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Clear the store and rebuild it from `source`.
    pub async fn build(&self, source: impl AsRef<Path>) -> Result<BuildSummary> {
        let _gate = self.rebuild_gate.write().await;
        self.build_locked(source.as_ref()).await
    }

    /// Replace the store with the configured snapshot, if it exists.
    pub async fn load_snapshot(&self) -> Result<bool> {
        let _gate = self.rebuild_gate.write().await;
        self.load_snapshot_locked().await
    }

    /// Write the store to the configured snapshot path.
    ///
    /// Waits for any build in progress, so a half-built store is never
    /// persisted.
    pub async fn save_snapshot(&self) -> Result<usize> {
        let _gate = self.rebuild_gate.read().await;
        self.store.save(&self.config.snapshot_path).await
    }

    // The `_locked` helpers expect the caller to hold the gate for writing.

    async fn build_locked(&self, source: &Path) -> Result<BuildSummary> {
        ParallelEmbedder::new(self.embedder.clone(), self.config.max_workers)
            .build(source, &self.store)
            .await
    }

    async fn load_snapshot_locked(&self) -> Result<bool> {
        let loaded = self.store.load(&self.config.snapshot_path).await?;

        if loaded {
            let dimension = self.config.dimension;
            let mismatched = self
                .store
                .read()
                .await
                .iter()
                .filter(|r| r.embedding.len() != dimension)
                .count();
            if mismatched > 0 {
                warn!(
                    "{mismatched} snapshot records do not have dimension {dimension} and will be skipped by searches"
                );
            }
        }

        Ok(loaded)
    }

    /// Load the snapshot unless `force_regenerate` is set or it is missing;
    /// otherwise build from `source` and persist the result.
    pub async fn load_or_build(
        &self,
        source: impl AsRef<Path>,
        force_regenerate: bool,
    ) -> Result<LoadOutcome> {
        let _gate = self.rebuild_gate.write().await;

        if !force_regenerate {
            match self.load_snapshot_locked().await {
                Ok(true) => {
                    let total_entries = self.store.len().await;
                    info!(
                        "Using {total_entries} cached embeddings from {}",
                        self.config.snapshot_path.display()
                    );
                    return Ok(LoadOutcome::LoadedFromCache { total_entries });
                }
                Ok(false) => {}
                Err(e) => warn!(
                    "Ignoring unreadable snapshot {}: {e}",
                    self.config.snapshot_path.display()
                ),
            }
        }

        let summary = self.build_locked(source.as_ref()).await?;

        if summary.embedded > 0 {
            self.store.save(&self.config.snapshot_path).await?;
        } else {
            warn!("No chunks were embedded; snapshot left untouched");
        }

        Ok(LoadOutcome::Rebuilt(summary))
    }

    /// Find the `top_k` chunks most similar to `query`.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<SearchOutcome> {
        if query.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Input message must be a non-empty string.".to_string(),
            ));
        }
        if top_k > MAX_TOP_K {
            return Err(EmbeddingError::TopKTooLarge {
                requested: top_k,
                max: MAX_TOP_K,
            });
        }

        let _gate = self.rebuild_gate.read().await;

        if self.store.is_empty().await {
            return Ok(SearchOutcome::NoData(
                "Vector database is empty. Initialize it first.".to_string(),
            ));
        }

        let query_embedding = self.embedder.embed(query).await?;

        let results = {
            let records = self.store.read().await;
            rank_top_k(&query_embedding, &records, top_k)
        };

        if results.is_empty() {
            return Ok(SearchOutcome::NoData(format!(
                "No relevant information found for: '{query}'"
            )));
        }

        debug!("Search for '{query}' returned {} results", results.len());
        Ok(SearchOutcome::Matches(results))
    }
}
