//! Tier implementations behind a common [`Chunker`] trait.
//!
//! Each tier is an independent strategy over the same request shape. The
//! orchestrator holds them as trait objects so tests can swap in faulty
//! implementations and exercise the degradation chain.

use async_trait::async_trait;

use crate::types::{Chunk, ChunkingError, ChunkingRequest};

pub mod llm;
pub mod semantic;
pub mod size;

pub use llm::LlmChunker;
pub use semantic::SemanticChunker;
pub use size::SizeChunker;

/// A chunking strategy.
///
/// Implementations read `request.text` (and, for the high tier,
/// `request.metadata`) and ignore `request.tier`; tier dispatch is the
/// orchestrator's job.
#[async_trait]
pub trait Chunker: Send + Sync {
    async fn chunk(&self, request: &ChunkingRequest) -> Result<Vec<Chunk>, ChunkingError>;
}
