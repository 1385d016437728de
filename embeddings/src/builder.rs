//! Parallel construction of the vector store from a source document.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::chunker::split_lines;
use crate::error::{EmbeddingError, Result};
use crate::provider::Embedder;
use crate::store::{ChunkRecord, VectorStore};

/// Outcome of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Document the store was built from.
    pub source: PathBuf,

    /// Number of non-blank chunks found.
    pub total_chunks: usize,

    /// Number of chunks embedded and stored.
    pub embedded: usize,

    /// Identifiers of chunks whose embedding failed, ascending.
    pub failed_chunk_ids: Vec<usize>,

    /// Records in the store once the build finished.
    pub total_entries: usize,
}

impl BuildSummary {
    /// Whether some chunks could not be embedded.
    pub fn is_partial(&self) -> bool {
        self.embedded < self.total_chunks
    }
}

/// Embeds every chunk of a document with a bounded number of concurrent
/// provider calls.
pub struct ParallelEmbedder {
    embedder: Embedder,
    max_workers: usize,
}

impl ParallelEmbedder {
    /// Create a builder with `max_workers` concurrent requests (at least one).
    pub fn new(embedder: Embedder, max_workers: usize) -> Self {
        Self {
            embedder,
            max_workers: max_workers.max(1),
        }
    }

    /// Clear `store` and repopulate it from the document at `source`.
    ///
    /// Records are appended in completion order. A chunk that fails to embed
    /// is logged and listed in the summary; its siblings carry on.
    pub async fn build(&self, source: &Path, store: &VectorStore) -> Result<BuildSummary> {
        store.clear().await;

        let content = match fs::read_to_string(source).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(EmbeddingError::SourceNotFound(source.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let chunks = split_lines(&content);
        if chunks.is_empty() {
            return Err(EmbeddingError::EmptySource(source.to_path_buf()));
        }

        let total_chunks = chunks.len();
        info!(
            "Embedding {total_chunks} chunks from {} with {} workers",
            source.display(),
            self.max_workers
        );

        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        let mut pending: BTreeSet<usize> = chunks.iter().map(|chunk| chunk.id).collect();

        for chunk in chunks {
            let embedder = self.embedder.clone();
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let embedded = embedder.embed(&chunk.text).await;
                let record = embedded.map(|embedding| ChunkRecord {
                    text: chunk.text,
                    chunk_id: chunk.id,
                    embedding,
                });
                (chunk.id, record)
            });
        }

        let mut embedded = 0;
        let mut completed = 0;
        let mut failed_chunk_ids = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            completed += 1;
            match joined {
                Ok((chunk_id, Ok(record))) => {
                    pending.remove(&chunk_id);
                    store.append(record).await;
                    embedded += 1;
                    debug!("Embedded chunk {completed}/{total_chunks} (chunk {chunk_id})");
                }
                Ok((chunk_id, Err(e))) => {
                    pending.remove(&chunk_id);
                    warn!(
                        "Chunk {chunk_id} from {} failed to embed: {e}",
                        source.display()
                    );
                    failed_chunk_ids.push(chunk_id);
                }
                Err(e) => {
                    warn!("Embedding task for {} did not complete: {e}", source.display());
                }
            }
        }

        // Chunks whose task panicked or was cancelled never reported back.
        failed_chunk_ids.extend(pending);
        failed_chunk_ids.sort_unstable();
        let total_entries = store.len().await;

        if embedded < total_chunks {
            warn!(
                "Embedded {embedded}/{total_chunks} chunks from {}; {} failed",
                source.display(),
                total_chunks - embedded
            );
        } else {
            info!("Embedded all {total_chunks} chunks from {}", source.display());
        }

        Ok(BuildSummary {
            source: source.to_path_buf(),
            total_chunks,
            embedded,
            failed_chunk_ids,
            total_entries,
        })
    }
}
