//! Deterministic provider for unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest};

/// Returns a fixed vector per text, `fallback` otherwise. Texts starting
/// with `FAIL` are rejected the way a throttled Bedrock call would be, and
/// texts starting with `PANIC` bring the calling task down.
pub(crate) struct StubProvider {
    vectors: HashMap<String, Embedding>,
    fallback: Embedding,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl StubProvider {
    pub(crate) fn new(fallback: Embedding) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub(crate) fn with(mut self, text: &str, embedding: Embedding) -> Self {
        self.vectors.insert(text.to_string(), embedding);
        self
    }

    /// Hold every call until the test adds permits to `gate`.
    pub(crate) fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if request.text.starts_with("PANIC") {
            panic!("stub provider crashed on {}", request.text);
        }

        if request.text.starts_with("FAIL") {
            return Err(EmbeddingError::Provider {
                code: "ThrottlingException".to_string(),
                message: "Too many requests, please wait before trying again.".to_string(),
            });
        }

        Ok(self
            .vectors
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}
