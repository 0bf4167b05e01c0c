//! Ollama embedding provider.
//!
//! Provides semantic embeddings via Ollama's local API using models like
//! nomic-embed-text. Transient HTTP failures are retried with exponential
//! backoff inside the provider.

use crate::embeddings::provider::EmbeddingProvider;
use docent_core::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Ollama API endpoint for embeddings
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Maximum retry attempts for failed requests
const MAX_RETRIES: u32 = 3;

/// Initial backoff duration in milliseconds
const INITIAL_BACKOFF_MS: u64 = 100;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Ollama embedding provider using the local API.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    /// HTTP client for API requests
    client: Client,
    /// Ollama API base URL
    base_url: String,
    /// Model name (e.g., "nomic-embed-text")
    model: String,
    /// Expected embedding dimensions
    dimensions: usize,
}

/// Request payload for Ollama embeddings API
#[derive(Debug, Clone, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

/// Response from Ollama embeddings API
#[derive(Debug, Clone, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Error response from Ollama API
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl OllamaProvider {
    /// Create a new Ollama embedding provider.
    ///
    /// # Arguments
    /// * `endpoint` - Optional custom base URL (default http://localhost:11434)
    /// * `model` - Embedding model name
    /// * `dimensions` - Expected vector dimensions
    pub fn new(endpoint: Option<&str>, model: &str, dimensions: usize) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                AppError::Retrieval(format!("Failed to create HTTP client for Ollama: {}", e))
            })?;

        let base_url = endpoint
            .map(str::to_string)
            .or_else(|| std::env::var("OLLAMA_URL").ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
            dimensions,
        })
    }

    /// Embed single text with retry logic.
    async fn embed_with_retries(&self, text: &str, retries: u32) -> AppResult<Vec<f32>> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt < retries {
            match self.embed_single(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) => {
                    attempt += 1;
                    last_error = Some(e);

                    if attempt < retries {
                        let backoff_ms = INITIAL_BACKOFF_MS * 2_u64.pow(attempt);
                        warn!(
                            "Embedding failed (attempt {}/{}), retrying in {}ms",
                            attempt, retries, backoff_ms
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::Retrieval("Unknown embedding error".to_string())))
    }

    /// Embed single text (no retries).
    async fn embed_single(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        debug!("Sending embedding request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to send request to Ollama: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(AppError::Retrieval(format!(
                    "Ollama API error ({}): {}",
                    status, error_response.error
                )));
            }

            return Err(AppError::Retrieval(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse Ollama response: {}", e)))?;

        if response_body.embedding.len() != self.dimensions {
            return Err(AppError::Retrieval(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                response_body.embedding.len(),
                self.dimensions
            )));
        }

        Ok(response_body.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::Retrieval("Cannot embed empty text".to_string()));
        }

        self.embed_with_retries(text, MAX_RETRIES).await
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!("Embedding batch of {} texts", texts.len());

        // Ollama doesn't support a batch API, so we embed sequentially
        let mut embeddings = Vec::with_capacity(texts.len());

        for (i, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                warn!("Skipping empty text at index {}", i);
                embeddings.push(vec![0.0; self.dimensions]);
                continue;
            }

            let embedding = self.embed(text).await?;
            embeddings.push(embedding);
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OllamaProvider::new(None, "nomic-embed-text", 768).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "nomic-embed-text");
        assert_eq!(provider.dimensions(), 768);
    }

    #[test]
    fn test_provider_custom_endpoint() {
        let provider =
            OllamaProvider::new(Some("http://embeddings.local:11434"), "all-minilm", 384).unwrap();
        assert_eq!(provider.base_url, "http://embeddings.local:11434");
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let provider = OllamaProvider::new(None, "nomic-embed-text", 768).unwrap();
        let result = provider.embed("   ").await;
        assert!(result.is_err());
    }
}
