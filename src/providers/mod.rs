//! Provider abstractions for embeddings and answer generation
//!
//! Trait seams keep the remote API swappable (and mockable in tests); the
//! default implementations call an OpenAI-compatible endpoint.

pub mod embedding;
pub mod llm;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use openai::{OpenAiEmbedder, OpenAiLlm, OpenAiProvider};
