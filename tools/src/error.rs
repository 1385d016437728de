//! Error types for the tool layer.

use thiserror::Error;

/// Result type alias for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised while resolving or invoking a tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool not found.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Tool already exists.
    #[error("tool already exists: {0}")]
    AlreadyExists(String),

    /// Invalid tool input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Distance unit outside km, au and ly.
    #[error("Unsupported unit: {0}")]
    UnsupportedUnit(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
