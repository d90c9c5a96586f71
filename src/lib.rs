//! Tiered document chunking for RAG ingestion.
//!
//! ```text
//! Raw text + tier ──► ChunkingService (orchestrator)
//!                            │
//!              ┌─────────────┼─────────────┐
//!              ▼             ▼             ▼
//!         SizeChunker  SemanticChunker  LlmChunker
//!          (low)          (medium)        (high)
//!              │             │                │
//!              │        segmenter ──► EmbeddingProvider ──► merger
//!              │             │                │
//!              │             │         BoundaryDetector
//!              └──────◄── fallback on any tier failure ──◄──┘
//!                            │
//!                            ▼
//!              ordered, labeled Chunk sequence
//! ```
//!
//! Three strategies trade cost and latency for boundary quality:
//!
//! - **low** — pure size-based segmentation at paragraph/sentence boundaries.
//! - **medium** — size-based pieces embedded concurrently, then adjacent
//!   pieces merged when their embeddings clear a cosine-similarity threshold.
//! - **high** — an LLM boundary detector labels topic/subtopic chunks
//!   directly.
//!
//! Any failure in the medium or high tier degrades to the low tier, so a
//! slow or unavailable embedding/LLM service costs chunk quality, never
//! ingestion availability. The algorithmic core ([`segmenter`], [`merger`])
//! is pure and synchronous; external services sit behind the
//! [`EmbeddingProvider`] and [`BoundaryDetector`] traits.

pub mod boundaries;
pub mod chunkers;
pub mod config;
pub mod embeddings;
pub mod merger;
pub mod segmenter;
pub mod service;
pub mod types;

pub use boundaries::BoundaryDetector;
pub use chunkers::{Chunker, LlmChunker, SemanticChunker, SizeChunker};
pub use config::ChunkingConfig;
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider};
pub use merger::{cosine_similarity, merge_by_similarity};
pub use segmenter::split_by_size;
pub use service::{ChunkingService, ChunkingServiceBuilder};
pub use types::{Chunk, ChunkKind, ChunkMetadata, ChunkingError, ChunkingRequest, Tier};
