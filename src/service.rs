//! Chunking orchestrator.
//!
//! [`ChunkingService`] is the single entry point callers use: it dispatches a
//! request to the selected tier, times the run, and enforces the pipeline's
//! reliability contract — every tier above low has a hard availability floor.
//! A transient embedding or LLM outage degrades chunk quality but never
//! blocks ingestion; only a low-tier failure surfaces to the caller.
//!
//! The service is stateless across calls and safe to share between
//! concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use crate::boundaries::BoundaryDetector;
use crate::chunkers::{Chunker, LlmChunker, SemanticChunker, SizeChunker};
use crate::config::ChunkingConfig;
use crate::embeddings::EmbeddingProvider;
use crate::types::{Chunk, ChunkingError, ChunkingRequest, Tier};

/// Tier-dispatching chunking orchestrator.
///
/// Build via [`ChunkingService::builder`]:
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use chunksmith::{ChunkingRequest, ChunkingService, MockEmbeddingProvider, Tier};
///
/// # async fn demo() -> Result<(), chunksmith::ChunkingError> {
/// let service = ChunkingService::builder()
///     .with_embedding_provider(Arc::new(MockEmbeddingProvider::new()))
///     .build();
///
/// let request = ChunkingRequest::new("tenant-1", "corr-1", "Some document text.")
///     .with_tier(Tier::Medium);
/// let chunks = service.chunk(request).await?;
/// # Ok(())
/// # }
/// ```
pub struct ChunkingService {
    low: Arc<dyn Chunker>,
    medium: Arc<dyn Chunker>,
    high: Arc<dyn Chunker>,
}

impl ChunkingService {
    pub fn builder() -> ChunkingServiceBuilder {
        ChunkingServiceBuilder::default()
    }

    /// Chunk a document with the requested tier, degrading to the low tier on
    /// any tier failure.
    ///
    /// # Errors
    ///
    /// Only a low-tier failure (the floor of the degradation chain) is ever
    /// returned; medium and high failures are logged and absorbed.
    pub async fn chunk(&self, request: ChunkingRequest) -> Result<Vec<Chunk>, ChunkingError> {
        let started = Instant::now();
        let tier = request.tier;
        tracing::info!(
            tenant_id = %request.tenant_id,
            correlation_id = %request.correlation_id,
            %tier,
            text_len = request.text.len(),
            "chunking started"
        );

        let selected: &Arc<dyn Chunker> = match tier {
            Tier::Low => &self.low,
            Tier::Medium => &self.medium,
            Tier::High => &self.high,
        };

        match selected.chunk(&request).await {
            Ok(chunks) => {
                tracing::info!(
                    tenant_id = %request.tenant_id,
                    correlation_id = %request.correlation_id,
                    %tier,
                    duration_ms = started.elapsed().as_millis() as u64,
                    chunk_count = chunks.len(),
                    "chunking complete"
                );
                Ok(chunks)
            }
            Err(error) => {
                tracing::error!(
                    tenant_id = %request.tenant_id,
                    correlation_id = %request.correlation_id,
                    %tier,
                    %error,
                    "chunking tier failed"
                );
                if tier == Tier::Low {
                    return Err(error);
                }

                tracing::warn!(
                    tenant_id = %request.tenant_id,
                    correlation_id = %request.correlation_id,
                    failed_tier = %tier,
                    "falling back to low tier"
                );
                let chunks = self.low.chunk(&request).await?;
                tracing::info!(
                    tenant_id = %request.tenant_id,
                    correlation_id = %request.correlation_id,
                    %tier,
                    duration_ms = started.elapsed().as_millis() as u64,
                    chunk_count = chunks.len(),
                    fallback_used = true,
                    "chunking complete after fallback"
                );
                Ok(chunks)
            }
        }
    }
}

/// Builder for [`ChunkingService`].
///
/// The embedding provider enables the medium tier and the boundary detector
/// enables the high tier; a service built without them still works — those
/// tiers fail on first use and degrade to low. Per-tier chunker overrides
/// exist for tests that need to inject faults.
#[derive(Default)]
pub struct ChunkingServiceBuilder {
    config: Option<ChunkingConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    boundary_detector: Option<Arc<dyn BoundaryDetector>>,
    low: Option<Arc<dyn Chunker>>,
    medium: Option<Arc<dyn Chunker>>,
    high: Option<Arc<dyn Chunker>>,
}

impl ChunkingServiceBuilder {
    #[must_use]
    pub fn with_config(mut self, config: ChunkingConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn with_boundary_detector(mut self, detector: Arc<dyn BoundaryDetector>) -> Self {
        self.boundary_detector = Some(detector);
        self
    }

    /// Replace the low-tier chunker. This also replaces the fallback target.
    #[must_use]
    pub fn with_low_chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.low = Some(chunker);
        self
    }

    #[must_use]
    pub fn with_medium_chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.medium = Some(chunker);
        self
    }

    #[must_use]
    pub fn with_high_chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.high = Some(chunker);
        self
    }

    pub fn build(self) -> ChunkingService {
        let config = self.config.unwrap_or_default();

        let low = self
            .low
            .unwrap_or_else(|| Arc::new(SizeChunker::new(config.clone())));
        let medium = self.medium.unwrap_or_else(|| match self.embedding_provider {
            Some(provider) => Arc::new(SemanticChunker::new(provider, config.clone())),
            None => Arc::new(SemanticChunker::unconfigured(config.clone())),
        });
        let high = self.high.unwrap_or_else(|| match self.boundary_detector {
            Some(detector) => Arc::new(LlmChunker::new(detector, config.clone())),
            None => Arc::new(LlmChunker::unconfigured(config)),
        });

        ChunkingService { low, medium, high }
    }
}
