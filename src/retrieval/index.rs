//! In-memory cosine-similarity index
//!
//! The index is rebuilt from scratch for every request and discarded with it;
//! at per-request scale (one invoice plus the CNAE table) a brute-force scan
//! is the whole story, no ANN structure needed.

use crate::error::{Error, Result};
use crate::types::document::Chunk;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (0.0-1.0, higher is better)
    pub similarity: f32,
}

/// Per-request index over embedded chunks
pub struct ChunkIndex {
    chunks: Vec<Chunk>,
}

impl ChunkIndex {
    /// Build an index from embedded chunks.
    ///
    /// Every chunk must already carry an embedding.
    pub fn new(chunks: Vec<Chunk>) -> Result<Self> {
        if let Some(chunk) = chunks.iter().find(|c| c.embedding.is_empty()) {
            return Err(Error::embedding(format!(
                "Chunk {} has no embedding",
                chunk.id
            )));
        }

        Ok(Self { chunks })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Find the `top_k` chunks most similar to the query embedding
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                similarity: cosine_similarity(query_embedding, &chunk.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        results
    }
}

/// Cosine similarity between two vectors; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
