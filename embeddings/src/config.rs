//! Configuration for the vector search index.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::DEFAULT_DIMENSION;
use crate::error::{EmbeddingError, Result};

/// Configuration for building and querying the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSearchConfig {
    /// Embedding provider configuration.
    pub provider: ProviderConfig,

    /// Length of every embedding vector.
    pub dimension: usize,

    /// Ask the provider for unit-length vectors.
    pub normalize: bool,

    /// Maximum number of concurrent embedding requests during a build.
    pub max_workers: usize,

    /// Where the JSON snapshot of the store lives.
    pub snapshot_path: PathBuf,
}

impl VectorSearchConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| EmbeddingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| EmbeddingError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the worker pool width.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Set the snapshot location.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Set the provider configuration.
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    /// Reject values that cannot produce a working index.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(EmbeddingError::Config(
                "dimension must be greater than zero".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(EmbeddingError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.provider.model.trim().is_empty() {
            return Err(EmbeddingError::Config("provider model is empty".to_string()));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(EmbeddingError::Config(
                "provider base_url is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            dimension: DEFAULT_DIMENSION,
            normalize: true,
            max_workers: 4,
            snapshot_path: PathBuf::from("objects/datasets/embeddings.json"),
        }
    }
}

/// Configuration for the remote embedding provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bedrock runtime endpoint.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Environment variable holding the bearer token.
    pub api_key_env: String,

    /// Per-request timeout; `None` leaves it to the HTTP client.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            model: "amazon.titan-embed-text-v2:0".to_string(),
            api_key_env: "AWS_BEARER_TOKEN_BEDROCK".to_string(),
            request_timeout_secs: None,
        }
    }
}
