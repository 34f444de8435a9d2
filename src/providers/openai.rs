//! OpenAI-backed providers for embeddings and answer generation
//!
//! Both providers wrap a shared `OpenAiClient` so the two concerns reuse one
//! connection pool.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::{OpenAiClient, PromptBuilder};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Embedding provider calling the `/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
}

impl OpenAiEmbedder {
    /// Create a new embedder with its own client
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Arc::new(OpenAiClient::new(config)),
        }
    }

    /// Create from an existing shared client
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Native batching: one request for the whole document set
        self.client.embed_batch(texts).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// LLM provider calling the `/chat/completions` endpoint
pub struct OpenAiLlm {
    client: Arc<OpenAiClient>,
    model: String,
}

impl OpenAiLlm {
    /// Create a new LLM provider with its own client
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Arc::new(OpenAiClient::new(config)),
            model: config.chat_model.clone(),
        }
    }

    /// Create from an existing shared client
    pub fn from_client(client: Arc<OpenAiClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlm {
    async fn generate_answer(
        &self,
        question: &str,
        context: &str,
        history: &[(String, String)],
    ) -> Result<String> {
        let messages = PromptBuilder::build_messages(None, question, context, history);
        self.client.chat(&messages).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Combined provider pair sharing a single client
pub struct OpenAiProvider {
    embedder: OpenAiEmbedder,
    llm: OpenAiLlm,
}

impl OpenAiProvider {
    /// Create a new combined provider
    pub fn new(config: &LlmConfig) -> Self {
        let client = Arc::new(OpenAiClient::new(config));
        Self {
            embedder: OpenAiEmbedder::from_client(Arc::clone(&client)),
            llm: OpenAiLlm::from_client(client, config.chat_model.clone()),
        }
    }

    /// Split into separate providers
    pub fn split(self) -> (OpenAiEmbedder, OpenAiLlm) {
        (self.embedder, self.llm)
    }
}
