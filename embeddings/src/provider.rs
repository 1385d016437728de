//! Embedding providers.
//!
//! `EmbeddingProvider` is the raw remote call. `Embedder` wraps a provider
//! with the checks every caller relies on: trimmed non-empty input and a
//! vector of exactly the configured dimension.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Embedding;
use crate::config::ProviderConfig;
use crate::error::{EmbeddingError, Result};

/// Request for generating an embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Text to embed.
    pub text: String,

    /// Dimensions for the output (if supported by provider).
    pub dimensions: Option<usize>,

    /// Whether the provider should return a unit-length vector.
    pub normalize: bool,
}

impl EmbeddingRequest {
    /// Create a new embedding request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            dimensions: None,
            normalize: true,
        }
    }

    /// Set the output dimensions.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set whether the output is normalized.
    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the model this provider invokes.
    fn model(&self) -> &str;

    /// Generate an embedding for the given request. One call, no caching.
    async fn embed(&self, request: EmbeddingRequest) -> Result<Embedding>;
}

/// Amazon Bedrock Titan Text Embeddings provider.
pub struct TitanProvider {
    /// Bearer token.
    api_key: Option<String>,

    /// Bedrock runtime base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model identifier.
    model: String,
}

impl TitanProvider {
    /// Create a provider with default settings, reading the token from
    /// `AWS_BEARER_TOKEN_BEDROCK`.
    pub fn new() -> Self {
        let defaults = ProviderConfig::default();
        Self {
            api_key: std::env::var(&defaults.api_key_env).ok(),
            base_url: defaults.base_url,
            client: reqwest::Client::new(),
            model: defaults.model,
        }
    }

    /// Create a provider from configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            api_key: std::env::var(&config.api_key_env).ok(),
            base_url: config.base_url.clone(),
            client,
            model: config.model.clone(),
        })
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Check if the provider has credentials.
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn invoke_url(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for TitanProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for TitanProvider {
    fn name(&self) -> &str {
        "bedrock-titan"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Embedding> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            EmbeddingError::ProviderNotConfigured("no Bedrock API key set".to_string())
        })?;

        let mut body = serde_json::json!({
            "inputText": request.text,
            "normalize": request.normalize,
            "embeddingTypes": ["float"]
        });

        if let Some(dims) = request.dimensions {
            body["dimensions"] = serde_json::json!(dims);
        }

        debug!("Invoking {} for embedding", self.model);

        let response = self
            .client
            .post(self.invoke_url())
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let code = response
                .headers()
                .get("x-amzn-ErrorType")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(':').next())
                .filter(|v| !v.is_empty())
                .map_or_else(|| status.as_u16().to_string(), str::to_string);
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&error_text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(error_text);

            return Err(EmbeddingError::Provider { code, message });
        }

        let body: serde_json::Value = response.json().await?;
        parse_embedding(body)
    }
}

/// Error payload returned by Bedrock.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// The two response shapes Titan may produce.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TitanResponseBody {
    ByType {
        #[serde(rename = "embeddingsByType")]
        embeddings_by_type: FloatEmbeddings,
    },
    Flat {
        embedding: Embedding,
    },
}

#[derive(Debug, Deserialize)]
struct FloatEmbeddings {
    float: Embedding,
}

impl TitanResponseBody {
    fn into_embedding(self) -> Embedding {
        match self {
            Self::ByType { embeddings_by_type } => embeddings_by_type.float,
            Self::Flat { embedding } => embedding,
        }
    }
}

/// Extract the vector from a Titan response body.
pub(crate) fn parse_embedding(body: serde_json::Value) -> Result<Embedding> {
    serde_json::from_value::<TitanResponseBody>(body)
        .map(TitanResponseBody::into_embedding)
        .map_err(|_| EmbeddingError::MissingEmbeddingField)
}

/// A provider bound to a fixed output dimension.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
    normalize: bool,
}

impl Embedder {
    /// Create an embedder that requests normalized vectors of `dimension`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, dimension: usize) -> Self {
        Self {
            provider,
            dimension,
            normalize: true,
        }
    }

    /// Ask for raw (non-normalized) vectors.
    pub fn without_normalization(mut self) -> Self {
        self.normalize = false;
        self
    }

    /// The dimension every returned vector has.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed `text` after trimming it.
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "text to embed must not be empty".to_string(),
            ));
        }

        let request = EmbeddingRequest::new(text)
            .with_dimensions(self.dimension)
            .normalized(self.normalize);
        let embedding = self.provider.embed(request).await?;

        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        debug!(
            "Generated {} dimension embedding with {} ({})",
            embedding.len(),
            self.provider.name(),
            self.provider.model()
        );
        Ok(embedding)
    }
}
