//! Medium tier: embedding-guided semantic chunking.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;

use super::Chunker;
use crate::config::ChunkingConfig;
use crate::embeddings::EmbeddingProvider;
use crate::merger::merge_by_similarity;
use crate::segmenter::split_by_size;
use crate::types::{Chunk, ChunkingError, ChunkingRequest};

/// Size-based segmentation refined by embedding-similarity merging.
///
/// Pieces are embedded concurrently (one request per piece, re-joined in
/// piece order) and adjacent pieces whose embeddings clear the similarity
/// threshold are merged into topically coherent chunks. A failed embedding is
/// replaced by a zero vector for that piece only, which forces a chunk
/// boundary there instead of an erroneous merge.
pub struct SemanticChunker {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    config: ChunkingConfig,
}

impl SemanticChunker {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: ChunkingConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
        }
    }

    /// A chunker with no provider; it fails on use so the orchestrator can
    /// degrade an unconfigured medium tier to the low tier.
    pub(crate) fn unconfigured(config: ChunkingConfig) -> Self {
        Self {
            provider: None,
            config,
        }
    }

    /// Fan out one embedding request per piece and re-join in piece order.
    ///
    /// Ordering never depends on completion order: `join_all` yields results
    /// positionally. Per-piece failures become zero vectors of the provider's
    /// dimensionality.
    async fn embed_all(
        &self,
        provider: &Arc<dyn EmbeddingProvider>,
        pieces: &[String],
        request: &ChunkingRequest,
    ) -> Vec<Vec<f32>> {
        let futures = pieces.iter().enumerate().map(|(index, piece)| {
            let provider = Arc::clone(provider);
            async move {
                match provider
                    .embed(piece, &request.tenant_id, &request.correlation_id)
                    .await
                {
                    Ok(embedding) => embedding,
                    Err(error) => {
                        tracing::warn!(
                            tenant_id = %request.tenant_id,
                            correlation_id = %request.correlation_id,
                            piece = index,
                            %error,
                            "embedding failed for piece, substituting zero vector"
                        );
                        vec![0.0; provider.dims()]
                    }
                }
            }
        });
        join_all(futures).await
    }
}

#[async_trait]
impl Chunker for SemanticChunker {
    async fn chunk(&self, request: &ChunkingRequest) -> Result<Vec<Chunk>, ChunkingError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(ChunkingError::MissingEmbeddingProvider)?;

        tracing::info!(
            tenant_id = %request.tenant_id,
            correlation_id = %request.correlation_id,
            text_len = request.text.len(),
            "semantic chunking started"
        );

        let pieces = split_by_size(&request.text, self.config.max_piece_size);

        // Trivially short documents don't warrant embedding calls.
        if pieces.len() <= 1 {
            return Ok(pieces.into_iter().map(Chunk::topic).collect());
        }

        tracing::info!(
            tenant_id = %request.tenant_id,
            correlation_id = %request.correlation_id,
            initial_pieces = pieces.len(),
            "initial segmentation complete"
        );

        let embeddings = self.embed_all(provider, &pieces, request).await;
        let initial_count = pieces.len();
        let merged = merge_by_similarity(pieces, &embeddings, self.config.similarity_threshold);

        tracing::info!(
            tenant_id = %request.tenant_id,
            correlation_id = %request.correlation_id,
            initial_pieces = initial_count,
            final_chunks = merged.len(),
            "semantic chunking complete"
        );

        Ok(merged.into_iter().map(Chunk::topic).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::embeddings::MockEmbeddingProvider;
    use crate::types::ChunkKind;

    struct CountingProvider {
        inner: MockEmbeddingProvider,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                inner: MockEmbeddingProvider::new().with_dims(32),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        fn dims(&self) -> usize {
            self.inner.dims()
        }

        async fn embed(
            &self,
            text: &str,
            tenant_id: &str,
            correlation_id: &str,
        ) -> Result<Vec<f32>, ChunkingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text, tenant_id, correlation_id).await
        }
    }

    fn request_with(text: &str) -> ChunkingRequest {
        ChunkingRequest::new("tenant-1", "corr-1", text)
    }

    #[tokio::test]
    async fn short_document_skips_embedding_calls() {
        let provider = Arc::new(CountingProvider::new());
        let chunker = SemanticChunker::new(provider.clone(), ChunkingConfig::default());
        let chunks = chunker
            .chunk(&request_with("One short paragraph."))
            .await
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, Some(ChunkKind::Topic));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn embeds_each_piece_exactly_once() {
        let provider = Arc::new(CountingProvider::new());
        let config = ChunkingConfig {
            max_piece_size: 30,
            ..Default::default()
        };
        let chunker = SemanticChunker::new(provider.clone(), config);
        let text = "First paragraph here today.\n\nSecond paragraph over there.\n\nThird paragraph somewhere else.";
        let chunks = chunker.chunk(&request_with(text)).await.unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unconfigured_chunker_errors() {
        let chunker = SemanticChunker::unconfigured(ChunkingConfig::default());
        let err = chunker
            .chunk(&request_with("some text"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChunkingError::MissingEmbeddingProvider));
    }

    #[tokio::test]
    async fn per_piece_failure_forces_boundary() {
        struct FailSecondPiece;

        #[async_trait]
        impl EmbeddingProvider for FailSecondPiece {
            fn dims(&self) -> usize {
                4
            }

            async fn embed(
                &self,
                text: &str,
                _tenant_id: &str,
                _correlation_id: &str,
            ) -> Result<Vec<f32>, ChunkingError> {
                if text.contains("broken") {
                    Err(ChunkingError::Embedding("simulated outage".into()))
                } else {
                    Ok(vec![1.0, 0.0, 0.0, 0.0])
                }
            }
        }

        let config = ChunkingConfig {
            max_piece_size: 30,
            ..Default::default()
        };
        let chunker = SemanticChunker::new(Arc::new(FailSecondPiece), config);
        let text = "Alpha paragraph content here.\n\nThis broken piece fails hard.\n\nOmega paragraph content here.";
        let chunks = chunker.chunk(&request_with(text)).await.unwrap();

        // Identical embeddings would merge all three; the failed middle piece
        // gets a zero vector and stays isolated.
        assert_eq!(chunks.len(), 3);
        assert!(chunks[1].text.contains("broken"));
    }

    #[tokio::test]
    async fn output_preserves_input_order() {
        let provider = Arc::new(MockEmbeddingProvider::new().with_dims(32));
        let config = ChunkingConfig {
            max_piece_size: 25,
            ..Default::default()
        };
        let chunker = SemanticChunker::new(provider, config);
        let text = "Alpha starts everything.\n\nBeta follows closely now.\n\nGamma arrives right after.\n\nDelta finishes everything.";
        let chunks = chunker.chunk(&request_with(text)).await.unwrap();

        let joined: String = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let positions: Vec<usize> = ["Alpha", "Beta", "Gamma", "Delta"]
            .iter()
            .map(|name| joined.find(name).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
