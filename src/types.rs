//! Core value types for the chunking pipeline.
//!
//! Everything here is a transient value: requests and chunks are created fresh
//! per invocation and carry no identity beyond their position in the output
//! sequence.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous, retrieval-sized passage of a source document.
///
/// Chunks are immutable once produced. The low and medium tiers always tag
/// chunks as [`ChunkKind::Topic`] with no title; the high (LLM-guided) tier
/// may attach titles and subtopic tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk content. Never empty.
    pub text: String,
    /// Optional short label, produced by the high tier only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Semantic tag for the chunk, when the producing tier assigns one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChunkKind>,
}

impl Chunk {
    /// Build an untitled topic chunk, the shape the low and medium tiers emit.
    pub fn topic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            kind: Some(ChunkKind::Topic),
        }
    }

    /// Build a chunk with an explicit title and tag.
    pub fn labeled(text: impl Into<String>, title: impl Into<String>, kind: ChunkKind) -> Self {
        Self {
            text: text.into(),
            title: Some(title.into()),
            kind: Some(kind),
        }
    }
}

/// Semantic granularity tag assigned by the producing tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Topic,
    Subtopic,
}

/// Chunking strategy tier, trading cost/latency for boundary quality.
///
/// The variants form a degradation chain: any failure in [`Tier::Medium`] or
/// [`Tier::High`] falls back to [`Tier::Low`], which is the availability
/// floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Size-based segmentation only. No external calls.
    #[default]
    Low,
    /// Size-based segmentation refined by embedding-similarity merging.
    Medium,
    /// LLM-guided topic/subtopic boundary detection.
    High,
}

impl Tier {
    /// Parse a tier from an optional string, defaulting to [`Tier::Low`].
    ///
    /// Absent values default silently; unrecognized values default with a
    /// warning, so a bad tier selector degrades rather than errors.
    pub fn from_str_opt(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Tier::Low;
        };
        match raw.to_ascii_lowercase().as_str() {
            "low" => Tier::Low,
            "medium" => Tier::Medium,
            "high" => Tier::High,
            _ => {
                tracing::warn!(tier = %raw, "unrecognized chunking tier, defaulting to low");
                Tier::Low
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional ingestion hints, consumed by the high tier only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// A single chunking invocation.
///
/// `tenant_id` and `correlation_id` are opaque: they flow into log events for
/// attribution and tracing but never influence how text is divided.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkingRequest {
    pub tenant_id: String,
    pub correlation_id: String,
    #[serde(default)]
    pub tier: Tier,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChunkMetadata>,
}

impl ChunkingRequest {
    /// Create a request for the default (low) tier.
    pub fn new(
        tenant_id: impl Into<String>,
        correlation_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            correlation_id: correlation_id.into(),
            tier: Tier::default(),
            text: text.into(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Errors surfaced by the chunking pipeline.
///
/// Only a low-tier failure ever reaches callers of the orchestrator; every
/// other variant is absorbed by the degradation chain.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// The embedding client failed.
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// The LLM boundary detector failed.
    #[error("boundary detection failed: {0}")]
    BoundaryDetection(String),

    /// The medium tier was selected but no embedding provider is configured.
    #[error("no embedding provider configured for the medium tier")]
    MissingEmbeddingProvider,

    /// The high tier was selected but no boundary detector is configured.
    #[error("no boundary detector configured for the high tier")]
    MissingBoundaryDetector,

    /// A tier-internal failure that does not fit the other variants.
    #[error("chunker failed: {0}")]
    Chunker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parse_defaults_to_low() {
        assert_eq!(Tier::from_str_opt(None), Tier::Low);
        assert_eq!(Tier::from_str_opt(Some("low")), Tier::Low);
        assert_eq!(Tier::from_str_opt(Some("MEDIUM")), Tier::Medium);
        assert_eq!(Tier::from_str_opt(Some("High")), Tier::High);
        assert_eq!(Tier::from_str_opt(Some("turbo")), Tier::Low);
        assert_eq!(Tier::from_str_opt(Some("")), Tier::Low);
    }

    #[test]
    fn tier_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Medium).unwrap(), "\"medium\"");
        let parsed: Tier = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Tier::High);
    }

    #[test]
    fn chunk_serializes_kind_as_type() {
        let chunk = Chunk::labeled("body", "Heading", ChunkKind::Subtopic);
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["type"], "subtopic");
        assert_eq!(json["title"], "Heading");
    }

    #[test]
    fn chunk_omits_absent_fields() {
        let json = serde_json::to_value(Chunk::topic("body")).unwrap();
        assert!(json.get("title").is_none());
        assert_eq!(json["type"], "topic");
    }

    #[test]
    fn request_defaults_tier_when_absent() {
        let parsed: ChunkingRequest = serde_json::from_str(
            r#"{"tenant_id":"t1","correlation_id":"c1","text":"hello"}"#,
        )
        .unwrap();
        assert_eq!(parsed.tier, Tier::Low);
        assert!(parsed.metadata.is_none());
    }
}
