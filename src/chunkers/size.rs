//! Low tier: size-based chunking.

use async_trait::async_trait;

use super::Chunker;
use crate::config::ChunkingConfig;
use crate::segmenter::split_by_size;
use crate::types::{Chunk, ChunkingError, ChunkingRequest};

/// The availability floor of the pipeline.
///
/// Wraps the size-based segmenter directly: no embeddings, no LLM, no
/// external calls of any kind. Every other tier falls back to this one.
#[derive(Clone, Debug)]
pub struct SizeChunker {
    config: ChunkingConfig,
}

impl SizeChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Chunker for SizeChunker {
    async fn chunk(&self, request: &ChunkingRequest) -> Result<Vec<Chunk>, ChunkingError> {
        let pieces = split_by_size(&request.text, self.config.max_piece_size);
        Ok(pieces.into_iter().map(Chunk::topic).collect())
    }
}
