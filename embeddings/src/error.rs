//! Error types for the embeddings system.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embeddings system.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Provider not configured (usually a missing API key).
    #[error("embedding provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// Caller-supplied argument has the wrong shape or range.
    #[error("{0}")]
    InvalidInput(String),

    /// The remote provider rejected the call.
    #[error("embedding provider error ({code}): {message}")]
    Provider { code: String, message: String },

    /// The response carried neither recognised embedding field.
    #[error("no embedding found in provider response")]
    MissingEmbeddingField,

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Source document does not exist.
    #[error("file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Source document has no non-blank lines.
    #[error("no content chunks found in {}", .0.display())]
    EmptySource(PathBuf),

    /// Search asked for more results than allowed.
    #[error("no more than {max} results may be returned for a single query (requested {requested})")]
    TopKTooLarge { requested: usize, max: usize },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EmbeddingError {
    /// Whether the error was caused by the caller's arguments rather than by
    /// the system.
    pub fn is_input_validation(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::TopKTooLarge { .. })
    }
}
