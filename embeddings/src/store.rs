//! In-memory vector store with JSON snapshot persistence.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::Result;

/// One embedded chunk of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// The chunk text.
    pub text: String,

    /// Position of the chunk in the source's filtered chunk sequence.
    pub chunk_id: usize,

    /// The embedding vector.
    pub embedding: Embedding,
}

/// Ordered collection of chunk records.
///
/// Cloning shares the underlying records. Appends take the write lock, so
/// any number of producers may append concurrently.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    records: Arc<RwLock<Vec<ChunkRecord>>>,
}

impl VectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every record.
    pub async fn clear(&self) {
        self.records.write().await.clear();
        info!("Cleared vector store");
    }

    /// Add a record at the end.
    pub async fn append(&self, record: ChunkRecord) {
        self.records.write().await.push(record);
    }

    /// Replace the contents wholesale.
    pub async fn replace(&self, records: Vec<ChunkRecord>) {
        *self.records.write().await = records;
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store has no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Copy of the current records, in store order.
    pub async fn records(&self) -> Vec<ChunkRecord> {
        self.records.read().await.clone()
    }

    /// Borrow the records for a scan.
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<ChunkRecord>> {
        self.records.read().await
    }

    /// Write the snapshot to `path`, replacing any existing file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();

        let (content, count) = {
            let records = self.records.read().await;
            (serde_json::to_string(&*records)?, records.len())
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, content).await?;
        info!("Saved {count} embeddings to {}", path.display());
        Ok(count)
    }

    /// Replace the contents with the snapshot at `path`.
    ///
    /// Returns `false` and leaves the store untouched if the file is absent.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", path.display());
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<ChunkRecord> = serde_json::from_str(&content)?;
        let count = records.len();
        self.replace(records).await;

        info!("Loaded {count} embeddings from {}", path.display());
        Ok(true)
    }
}
