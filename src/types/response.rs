//! Response types for the analysis endpoints
//!
//! `message` and `resumo_tributario` keep the original wire keys; the source
//! list and timing are additive.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::retrieval::SearchResult;

/// Provenance of a chunk used to build the answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Source label (filename, "entrada_manual", or the CNAE table name)
    pub source: String,
    /// Cosine similarity to the question (0.0-1.0)
    pub similarity: f32,
}

/// Successful analysis response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Human-readable status message
    pub message: String,
    /// The LLM-generated tax summary
    pub resumo_tributario: String,
    /// Chunks the answer was grounded on
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

impl AnalysisResponse {
    /// Build a response from the generated summary and the retrieved chunks
    pub fn new(
        message: impl Into<String>,
        summary: String,
        results: &[SearchResult],
        processing_time_ms: u64,
    ) -> Self {
        let sources = results
            .iter()
            .map(|r| SourceRef {
                chunk_id: r.chunk.id,
                source: r.chunk.source.clone(),
                similarity: r.similarity,
            })
            .collect();

        Self {
            message: message.into(),
            resumo_tributario: summary,
            sources,
            processing_time_ms,
        }
    }
}
