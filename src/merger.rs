//! Embedding-similarity chunk merging.
//!
//! The medium tier's semantic contribution lives here: a single left-to-right
//! pass over size-based pieces that merges neighbors whose embeddings point
//! the same way. Pure functions, no logging, no I/O.

/// Cosine similarity between two embedding vectors, in `[-1.0, 1.0]`.
///
/// Defined as `0.0` when the vectors differ in length, are empty, or either
/// has (near-)zero magnitude. The zero-magnitude case is load-bearing: a
/// failed embedding is substituted with a zero vector, and similarity `0.0`
/// guarantees that piece never merges with a neighbor.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

/// Merge adjacent `pieces` whose embeddings are sufficiently similar.
///
/// Single forward pass, no backtracking: the current chunk carries a
/// representative embedding, and each subsequent piece either joins it (when
/// cosine similarity meets `threshold`; joined by a blank line) or closes it
/// and starts a new chunk. On a merge the representative becomes the
/// element-wise mean of itself and the new piece's embedding — an incremental
/// pairwise mean, not a centroid of everything merged so far, so later pieces
/// weigh progressively less against the baseline. That drift is intentional;
/// it keeps the pass O(n) and order-preserving.
///
/// `pieces` and `embeddings` must have equal lengths. The mismatch case is
/// debug-asserted; in release builds pieces without an embedding start their
/// own chunk rather than merging blindly.
pub fn merge_by_similarity(
    pieces: Vec<String>,
    embeddings: &[Vec<f32>],
    threshold: f32,
) -> Vec<String> {
    debug_assert_eq!(
        pieces.len(),
        embeddings.len(),
        "each piece needs exactly one embedding"
    );
    if pieces.len() <= 1 {
        return pieces;
    }

    let mut merged = Vec::new();
    let mut current: Option<(String, Vec<f32>)> = None;

    for (i, piece) in pieces.into_iter().enumerate() {
        let embedding = embeddings.get(i).cloned().unwrap_or_default();
        let Some((mut text, rep)) = current.take() else {
            current = Some((piece, embedding));
            continue;
        };

        if cosine_similarity(&rep, &embedding) >= threshold {
            text.push_str("\n\n");
            text.push_str(&piece);
            current = Some((text, pairwise_mean(&rep, &embedding)));
        } else {
            merged.push(text);
            current = Some((piece, embedding));
        }
    }

    if let Some((text, _)) = current {
        merged.push(text);
    }

    merged
}

fn pairwise_mean(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect()
}
