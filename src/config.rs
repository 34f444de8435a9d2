//! Configuration for the analysis service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM / embedding API configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// CNAE reference table configuration
    #[serde(default)]
    pub cnae: CnaeConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. `OPENAI_API_KEY` always overrides the file value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))?
        } else {
            tracing::info!("Config file {} not found, using defaults", path.display());
            Self::default()
        };

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.llm.api_key = key;
            }
        }

        Ok(config)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable permissive CORS (the original front end is served separately)
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 20MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 20 * 1024 * 1024,
        }
    }
}

/// OpenAI-compatible API configuration for embeddings and chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key (normally injected via OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat completion model name
    pub chat_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            embed_model: "text-embedding-ada-002".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0, // factual tax summaries, no creativity
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (smaller trailing chunks are still kept if they are
    /// the only content)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 150,
            min_chunk_size: 50,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve for the prompt context
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// CNAE reference table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CnaeConfig {
    /// Path to the CNAE tax-rate JSON table
    pub table_path: PathBuf,
}

impl Default for CnaeConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from("data/cnae_table.json"),
        }
    }
}
