//! Answer generation: prompt assembly and the OpenAI-compatible client

pub mod openai;
pub mod prompt;

pub use openai::{ChatMessage, OpenAiClient};
pub use prompt::PromptBuilder;
