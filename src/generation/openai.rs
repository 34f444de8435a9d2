//! OpenAI-compatible API client with retry logic
//!
//! Covers the two endpoints the service needs: `/embeddings` (with native
//! batching) and `/chat/completions`. Any OpenAI-compatible base URL works.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// A chat message in the completions request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// System-role message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Assistant-role message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// API client with automatic retry
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Maximum retries
    max_retries: u32,
}

impl OpenAiClient {
    /// Create a new client with retry support
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_retries: config.max_retries,
            config: config.clone(),
        }
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Llm("Unknown error".to_string())))
    }

    /// Check if the API is reachable with the configured key
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);

        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding for a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::Embedding("Empty embedding response".to_string()))
    }

    /// Generate embeddings for a batch of texts in one request, preserving
    /// input order.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.config.base_url);

        self.retry_request(|| {
            let url = url.clone();

            async move {
                let request = EmbeddingsRequest {
                    model: &self.config.embed_model,
                    input: texts,
                };

                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::Embedding(format!("Embedding request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Embedding(format!(
                        "Embedding failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let embed_response: EmbeddingsResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::Embedding(format!("Failed to parse embedding response: {}", e)))?;

                if embed_response.data.len() != texts.len() {
                    return Err(Error::Embedding(format!(
                        "Expected {} embeddings, got {}",
                        texts.len(),
                        embed_response.data.len()
                    )));
                }

                let mut data = embed_response.data;
                data.sort_by_key(|d| d.index);

                Ok(data.into_iter().map(|d| d.embedding).collect())
            }
        })
        .await
    }

    /// Run a chat completion and return the assistant's reply
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::info!("Generating answer with model: {}", self.config.chat_model);

        self.retry_request(|| {
            let url = url.clone();

            async move {
                let request = ChatRequest {
                    model: &self.config.chat_model,
                    messages,
                    temperature: self.config.temperature,
                };

                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::Llm(format!("Generation request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Llm(format!(
                        "Generation failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let chat_response: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::Llm(format!("Failed to parse generation response: {}", e)))?;

                chat_response
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or_else(|| Error::Llm("Completion returned no choices".to_string()))
            }
        })
        .await
    }

    /// The configured chat model
    pub fn chat_model(&self) -> &str {
        &self.config.chat_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base_url: String) -> LlmConfig {
        LlmConfig {
            base_url,
            api_key: "test-key".to_string(),
            max_retries: 0,
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                // Out-of-order indices on purpose
                then.status(200).json_body(json!({
                    "data": [
                        {"index": 1, "embedding": [0.0, 1.0]},
                        {"index": 0, "embedding": [1.0, 0.0]}
                    ]
                }));
            })
            .await;

        let client = OpenAiClient::new(&test_config(server.base_url()));
        let embeddings = client
            .embed_batch(&["primeiro".to_string(), "segundo".to_string()])
            .await
            .unwrap();

        assert_eq!(embeddings[0], vec![1.0, 0.0]);
        assert_eq!(embeddings[1], vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_chat_returns_first_choice_content() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key");
                then.status(200).json_body(json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "Resumo tributário."}}
                    ]
                }));
            })
            .await;

        let client = OpenAiClient::new(&test_config(server.base_url()));
        let answer = client
            .chat(&[ChatMessage::user("Analise a nota")])
            .await
            .unwrap();

        assert_eq!(answer, "Resumo tributário.");
    }

    #[tokio::test]
    async fn test_upstream_error_surfaces_as_llm_error() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(500).body("upstream exploded");
            })
            .await;

        let client = OpenAiClient::new(&test_config(server.base_url()));
        let err = client.chat(&[ChatMessage::user("oi")]).await.unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
    }
}
