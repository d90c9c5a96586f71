//! LLM boundary-detection seam for the high tier.

use async_trait::async_trait;

use crate::types::{Chunk, ChunkMetadata, ChunkingError};

/// External collaborator that derives labeled chunk boundaries from raw text.
///
/// Implementations typically prompt an LLM and parse its response into
/// topic/subtopic chunks; that contract is entirely theirs. The pipeline only
/// requires that returned chunks appear in original text order. Errors
/// propagate to the orchestrator, which degrades to the low tier.
#[async_trait]
pub trait BoundaryDetector: Send + Sync {
    async fn detect_boundaries(
        &self,
        text: &str,
        tenant_id: &str,
        correlation_id: &str,
        metadata: Option<&ChunkMetadata>,
    ) -> Result<Vec<Chunk>, ChunkingError>;
}
