//! Pipeline configuration.
//!
//! All tuning knobs live here as explicit values injected through the service
//! builder, so tests can exercise boundary values deterministically instead of
//! fighting module-level constants.

use serde::{Deserialize, Serialize};

/// Configuration shared by the chunking tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum size of an initial piece produced by the size-based segmenter,
    /// in bytes. Applies to the low tier's output and the medium tier's
    /// pre-merge pieces.
    pub max_piece_size: usize,

    /// Cosine-similarity threshold at or above which adjacent pieces merge in
    /// the medium tier.
    pub similarity_threshold: f32,

    /// Texts shorter than this skip the LLM call in the high tier and come
    /// back as a single chunk.
    pub llm_min_input: usize,

    /// Maximum bytes forwarded to the LLM boundary detector; longer texts are
    /// truncated with a warning.
    pub llm_max_input: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_piece_size: 2000,
            similarity_threshold: 0.85,
            llm_min_input: 500,
            llm_max_input: 12_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_contract() {
        let config = ChunkingConfig::default();
        assert_eq!(config.max_piece_size, 2000);
        assert!((config.similarity_threshold - 0.85).abs() < f32::EPSILON);
        assert_eq!(config.llm_min_input, 500);
        assert_eq!(config.llm_max_input, 12_000);
    }
}
