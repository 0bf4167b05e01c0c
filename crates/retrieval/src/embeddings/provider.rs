//! Embedding provider trait and factory.

use docent_core::config::EmbeddingSettings;
use docent_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "mock", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Retrieval("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "mock" => {
            let provider = super::providers::mock::MockProvider::new(settings.dimensions);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let provider = super::providers::ollama::OllamaProvider::new(
                settings.endpoint.as_deref(),
                &settings.model,
                settings.dimensions,
            )?;
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: mock, ollama",
            settings.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_provider() {
        let settings = EmbeddingSettings {
            provider: "mock".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        };

        let provider = create_provider(&settings).unwrap();
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn test_create_ollama_provider() {
        let settings = EmbeddingSettings::default();
        let provider = create_provider(&settings).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "nomic-embed-text");
    }

    #[test]
    fn test_create_unknown_provider() {
        let settings = EmbeddingSettings {
            provider: "unknown".to_string(),
            model: "test".to_string(),
            dimensions: 384,
            endpoint: None,
        };

        let result = create_provider(&settings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let settings = EmbeddingSettings {
            provider: "mock".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        };
        let provider = create_provider(&settings).unwrap();

        let embedding = provider.embed("test text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }
}
