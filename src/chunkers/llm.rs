//! High tier: LLM-guided chunking.

use std::sync::Arc;

use async_trait::async_trait;

use super::Chunker;
use crate::boundaries::BoundaryDetector;
use crate::config::ChunkingConfig;
use crate::types::{Chunk, ChunkingError, ChunkingRequest};

/// Wraps a [`BoundaryDetector`] with the input-shaping rules the detector
/// should not have to care about.
///
/// Short texts skip the LLM entirely; texts beyond the detector's input
/// budget are truncated at a char boundary with a warning. Detector errors
/// propagate untouched so the orchestrator can fall back to the low tier.
pub struct LlmChunker {
    detector: Option<Arc<dyn BoundaryDetector>>,
    config: ChunkingConfig,
}

impl LlmChunker {
    pub fn new(detector: Arc<dyn BoundaryDetector>, config: ChunkingConfig) -> Self {
        Self {
            detector: Some(detector),
            config,
        }
    }

    /// A chunker with no detector; it fails on use so the orchestrator can
    /// degrade an unconfigured high tier to the low tier.
    pub(crate) fn unconfigured(config: ChunkingConfig) -> Self {
        Self {
            detector: None,
            config,
        }
    }
}

#[async_trait]
impl Chunker for LlmChunker {
    async fn chunk(&self, request: &ChunkingRequest) -> Result<Vec<Chunk>, ChunkingError> {
        let detector = self
            .detector
            .as_ref()
            .ok_or(ChunkingError::MissingBoundaryDetector)?;

        let text = request.text.as_str();
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        if text.len() < self.config.llm_min_input {
            return Ok(vec![Chunk::topic(text)]);
        }

        let input = if text.len() > self.config.llm_max_input {
            let cut = floor_char_boundary(text, self.config.llm_max_input);
            tracing::warn!(
                tenant_id = %request.tenant_id,
                correlation_id = %request.correlation_id,
                text_len = text.len(),
                max_input = self.config.llm_max_input,
                "text exceeds boundary detector input budget, truncating"
            );
            &text[..cut]
        } else {
            text
        };

        let chunks = detector
            .detect_boundaries(
                input,
                &request.tenant_id,
                &request.correlation_id,
                request.metadata.as_ref(),
            )
            .await?;

        // Detectors occasionally emit empty chunks; drop them rather than
        // violate the non-empty-text guarantee downstream.
        Ok(chunks
            .into_iter()
            .filter(|chunk| !chunk.text.trim().is_empty())
            .collect())
    }
}

/// Largest byte index `<= index` that falls on a UTF-8 char boundary.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::{ChunkKind, ChunkMetadata};

    struct RecordingDetector {
        seen: Mutex<Vec<String>>,
        response: Vec<Chunk>,
    }

    impl RecordingDetector {
        fn returning(response: Vec<Chunk>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl BoundaryDetector for RecordingDetector {
        async fn detect_boundaries(
            &self,
            text: &str,
            _tenant_id: &str,
            _correlation_id: &str,
            _metadata: Option<&ChunkMetadata>,
        ) -> Result<Vec<Chunk>, ChunkingError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.response.clone())
        }
    }

    fn config(min: usize, max: usize) -> ChunkingConfig {
        ChunkingConfig {
            llm_min_input: min,
            llm_max_input: max,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn short_text_skips_the_detector() {
        let detector = Arc::new(RecordingDetector::returning(vec![]));
        let chunker = LlmChunker::new(detector.clone(), config(500, 12_000));
        let request = ChunkingRequest::new("t1", "c1", "Tiny document.");
        let chunks = chunker.chunk(&request).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Tiny document.");
        assert!(detector.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_text_yields_no_chunks() {
        let detector = Arc::new(RecordingDetector::returning(vec![]));
        let chunker = LlmChunker::new(detector, config(500, 12_000));
        let request = ChunkingRequest::new("t1", "c1", "   \n\n  ");
        assert!(chunker.chunk(&request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_text_is_truncated_at_char_boundary() {
        let detector = Arc::new(RecordingDetector::returning(vec![Chunk::topic("out")]));
        let chunker = LlmChunker::new(detector.clone(), config(10, 100));
        let text = "é".repeat(120); // 240 bytes of 2-byte chars
        let request = ChunkingRequest::new("t1", "c1", text);
        chunker.chunk(&request).await.unwrap();

        let seen = detector.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 100);
        assert!(seen[0].chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn empty_detector_chunks_are_dropped() {
        let detector = Arc::new(RecordingDetector::returning(vec![
            Chunk::labeled("Intro body", "Intro", ChunkKind::Topic),
            Chunk::topic("   "),
            Chunk::labeled("Detail body", "Detail", ChunkKind::Subtopic),
        ]));
        let chunker = LlmChunker::new(detector, config(10, 12_000));
        let request = ChunkingRequest::new("t1", "c1", "A document long enough to chunk.");
        let chunks = chunker.chunk(&request).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].title.as_deref(), Some("Intro"));
        assert_eq!(chunks[1].kind, Some(ChunkKind::Subtopic));
    }

    #[tokio::test]
    async fn missing_detector_errors() {
        let chunker = LlmChunker::unconfigured(ChunkingConfig::default());
        let request = ChunkingRequest::new("t1", "c1", "text");
        let err = chunker.chunk(&request).await.unwrap_err();
        assert!(matches!(err, ChunkingError::MissingBoundaryDetector));
    }
}
