//! Application state for the analysis server

use std::sync::Arc;

use crate::analysis::AnalysisPipeline;
use crate::cnae::CnaeTable;
use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider, OpenAiProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: Arc<RagConfig>,
    /// Static CNAE tax-rate reference table, loaded once at startup
    cnae_table: Arc<CnaeTable>,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm_provider: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Create new application state from configuration
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing analysis state...");

        let cnae_table = Arc::new(CnaeTable::load(&config.cnae.table_path));

        let (embedder, llm) = OpenAiProvider::new(&config.llm).split();
        tracing::info!(
            "LLM providers initialized (embedding: {}, chat: {})",
            config.llm.embed_model,
            config.llm.chat_model
        );

        Ok(Self::with_providers(
            config,
            cnae_table,
            Arc::new(embedder),
            Arc::new(llm),
        ))
    }

    /// Create state with explicit providers (used by tests)
    pub fn with_providers(
        config: RagConfig,
        cnae_table: Arc<CnaeTable>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: Arc::new(config),
                cnae_table,
                embedding_provider,
                llm_provider,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the CNAE reference table
    pub fn cnae_table(&self) -> &Arc<CnaeTable> {
        &self.inner.cnae_table
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Build a fresh analysis pipeline for one request
    pub fn pipeline(&self) -> AnalysisPipeline {
        AnalysisPipeline::new(
            Arc::clone(&self.inner.config),
            Arc::clone(&self.inner.cnae_table),
            Arc::clone(&self.inner.embedding_provider),
            Arc::clone(&self.inner.llm_provider),
        )
    }
}
