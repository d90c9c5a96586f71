//! Embedding client seam.
//!
//! The pipeline never computes embeddings itself; it talks to an
//! [`EmbeddingProvider`] behind an `Arc`. Production deployments wire in a
//! remote client; tests and CI use [`MockEmbeddingProvider`], which is
//! deterministic and needs no network.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;

use crate::types::ChunkingError;

/// A client that maps a text piece to a fixed-dimension vector.
///
/// Implementations are expected to enforce their own timeouts; the medium
/// tier treats any error (or substitute for a timed-out call) as a per-piece
/// failure and degrades locally rather than aborting the whole operation.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Dimensionality of the vectors this provider returns.
    fn dims(&self) -> usize;

    /// Embed a single text piece.
    ///
    /// `tenant_id` and `correlation_id` are forwarded for attribution and
    /// tracing on the provider side; they must not affect the vector.
    async fn embed(
        &self,
        text: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> Result<Vec<f32>, ChunkingError>;
}

/// Deterministic, offline embedding provider for tests and examples.
///
/// Vectors are derived from a hash of the input text, so identical texts map
/// to identical vectors and different texts (almost always) to different
/// ones. The vectors carry no semantic meaning.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dims: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dims: 768 }
    }

    #[must_use]
    pub fn with_dims(mut self, dims: usize) -> Self {
        self.dims = dims;
        self
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(
        &self,
        text: &str,
        _tenant_id: &str,
        _correlation_id: &str,
    ) -> Result<Vec<f32>, ChunkingError> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish() | 1;

        let vector = (0..self.dims)
            .map(|_| {
                // splitmix-style scramble, mapped into [-1.0, 1.0)
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                ((state >> 33) as f32 / (1u64 << 30) as f32) - 1.0
            })
            .collect();
        Ok(vector)
    }
}
