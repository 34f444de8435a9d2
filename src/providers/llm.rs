//! LLM provider trait for generating tax summaries

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a tax summary given the user's question, the retrieved
    /// context, and the conversation history (question/answer pairs).
    async fn generate_answer(
        &self,
        question: &str,
        context: &str,
        history: &[(String, String)],
    ) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
