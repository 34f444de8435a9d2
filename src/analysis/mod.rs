//! Per-request analysis pipeline
//!
//! One request, one pipeline run: build the transient document set (invoice
//! text plus the formatted CNAE reference records), chunk it, embed it in a
//! single batch, retrieve the chunks closest to the question, and ask the LLM
//! for the tax summary. Nothing survives the request; there is no shared
//! mutable pipeline state between requests.

use std::sync::Arc;

use crate::cnae::CnaeTable;
use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{ChunkIndex, SearchResult};
use crate::types::document::{Chunk, Document, DocumentKind};

/// Result of one pipeline run
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// The generated tax summary
    pub summary: String,
    /// Chunks the answer was grounded on
    pub results: Vec<SearchResult>,
    /// Total chunks indexed for this request
    pub chunks_indexed: usize,
}

/// Per-request analysis pipeline
pub struct AnalysisPipeline {
    config: Arc<RagConfig>,
    cnae: Arc<CnaeTable>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
}

impl AnalysisPipeline {
    /// Create a pipeline over the shared read-only state
    pub fn new(
        config: Arc<RagConfig>,
        cnae: Arc<CnaeTable>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            config,
            cnae,
            embedder,
            llm,
        }
    }

    /// Run the full analysis for one invoice document.
    ///
    /// `history` carries prior question/answer pairs when the caller has any;
    /// the HTTP endpoints pass an empty history.
    pub async fn run(
        &self,
        invoice: Document,
        question: &str,
        history: &[(String, String)],
    ) -> Result<AnalysisOutcome> {
        if invoice.content.trim().is_empty() {
            return Err(Error::invalid_input(
                "Nenhum conteúdo válido foi encontrado para análise.",
            ));
        }

        tracing::info!(
            "Analyzing invoice from {} (content hash {})",
            invoice.source,
            invoice.content_hash
        );

        // Build the transient document set: invoice + CNAE reference records
        let mut documents = vec![invoice];
        documents.extend(self.cnae.to_documents());

        // Chunk everything
        let chunker = TextChunker::from_config(&self.config.chunking);
        let mut chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| chunker.chunk_document(doc))
            .collect();

        if chunks.is_empty() {
            return Err(Error::invalid_input("Texto insuficiente para análise."));
        }

        tracing::debug!(
            "Built {} chunks from {} documents ({} CNAE records)",
            chunks.len(),
            documents.len(),
            self.cnae.len()
        );

        // Embed the whole set in one batch
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let chunks_indexed = chunks.len();
        let index = ChunkIndex::new(chunks)?;

        // Retrieve the chunks closest to the question
        let query_embedding = self.embedder.embed(question).await?;
        let results = index.search(&query_embedding, self.config.retrieval.top_k);

        // Generate the summary
        let context = PromptBuilder::build_context(&results);
        let summary = self.llm.generate_answer(question, &context, history).await?;

        Ok(AnalysisOutcome {
            summary,
            results,
            chunks_indexed,
        })
    }

    /// Invoice chunks only, kind-tagged; used by handlers to build the
    /// invoice document consistently.
    pub fn invoice_document(source: impl Into<String>, content: String) -> Document {
        Document::new(source, DocumentKind::Invoice, content)
    }
}
