//! Collaborator construction.
//!
//! Builds the language-model client, the embedding provider and the search
//! client once at process start from the loaded configuration, and injects
//! them into the assistant chain. There is no cached global state — the
//! chain owns its collaborators for the life of the process.

use docent_chain::AssistantChain;
use docent_core::{config::AppConfig, config::ProviderConfig, AppError, AppResult};
use docent_llm::create_client;
use docent_retrieval::{create_provider, SearchClient};
use std::sync::Arc;

/// Build the assistant chain from configuration.
pub fn build_chain(config: &AppConfig) -> AppResult<AssistantChain> {
    // Resolve the completion endpoint from provider config
    let provider_config = config.get_provider_config(&config.provider);
    let endpoint = match provider_config {
        Some(ProviderConfig::Ollama { ref endpoint, .. }) => Some(endpoint.clone()),
        Some(ProviderConfig::OpenAI { ref endpoint, .. }) => endpoint.clone(),
        Some(ProviderConfig::Claude { ref endpoint, .. }) => endpoint.clone(),
        None => None,
    };

    let api_key = config.resolve_api_key(&config.provider);

    let llm = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
        .map_err(AppError::Config)?;

    tracing::debug!(
        "Created LLM client (provider: {}, model: {})",
        llm.provider_name(),
        config.model
    );

    let embedder = create_provider(&config.embedding)?;

    tracing::debug!(
        "Created embedding provider '{}' (model: {}, dimensions: {})",
        embedder.provider_name(),
        embedder.model_name(),
        embedder.dimensions()
    );

    let retriever = SearchClient::new(
        &config.search.endpoint,
        &config.search.index,
        config.resolve_search_key(),
        embedder,
    );

    Ok(AssistantChain::new(llm, Arc::new(retriever), &config.model)
        .with_top_k(config.search.top_k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chain_from_defaults() {
        let config = AppConfig::default();
        let chain = build_chain(&config);
        assert!(chain.is_ok());
    }

    #[test]
    fn test_build_chain_unknown_embedding_provider() {
        let mut config = AppConfig::default();
        config.embedding.provider = "unknown".to_string();
        assert!(build_chain(&config).is_err());
    }
}
