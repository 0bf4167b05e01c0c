//! Configuration management for Docent.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (docent.yaml)
//!
//! All collaborator clients (language model, embeddings, search service) are
//! constructed once at process start from the resulting `AppConfig` and
//! injected into the chain — there is no hidden global client cache.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default number of documents retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Default LLM provider (e.g., "openai", "claude", "ollama")
    pub provider: String,

    /// Default completion model identifier
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// Query embedding configuration
    pub embedding: EmbeddingSettings,

    /// Search service configuration
    pub search: SearchSettings,
}

/// LLM configuration from docent.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        #[serde(rename = "organizationEnv")]
        organization_env: Option<String>,
    },
    Claude {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        #[serde(rename = "apiVersion")]
        api_version: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

/// Query embedding settings.
///
/// The embedding vector is computed client-side and sent along with the
/// query text for hybrid ranking in the search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Embedding provider ("ollama", "mock")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Optional custom endpoint
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            endpoint: None,
        }
    }
}

/// Search service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Search service base URL
    pub endpoint: String,

    /// Index name to query
    pub index: String,

    /// Environment variable holding the search service API key
    #[serde(rename = "apiKeyEnv", default = "default_search_key_env")]
    pub api_key_env: String,

    /// Number of documents to retrieve per question
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,
}

fn default_search_key_env() -> String {
    "DOCENT_SEARCH_KEY".to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            index: "documents".to_string(),
            api_key_env: "DOCENT_SEARCH_KEY".to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    embedding: Option<EmbeddingSettings>,
    search: Option<SearchSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            embedding: EmbeddingSettings::default(),
            search: SearchSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `DOCENT_CONFIG`: Path to config file
    /// - `DOCENT_PROVIDER`: LLM provider
    /// - `DOCENT_MODEL`: Completion model identifier
    /// - `DOCENT_API_KEY`: API key for the LLM provider
    /// - `DOCENT_SEARCH_ENDPOINT`: Search service base URL
    /// - `DOCENT_SEARCH_INDEX`: Search index name
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("DOCENT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            PathBuf::from("docent.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCENT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCENT_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("DOCENT_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        if let Ok(index) = std::env::var("DOCENT_SEARCH_INDEX") {
            config.search.index = index;
        }

        config.api_key = std::env::var("DOCENT_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            // Set model from active provider config
            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = match provider_config {
                    ProviderConfig::OpenAI { model, .. } => model.clone(),
                    ProviderConfig::Claude { model, .. } => model.clone(),
                    ProviderConfig::Ollama { model, .. } => model.clone(),
                };
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the active provider configuration.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Resolve the LLM API key from environment variables.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Check explicit DOCENT_API_KEY first
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        // Try provider-specific config
        if let Some(provider_config) = self.get_provider_config(provider) {
            let env_var = match provider_config {
                ProviderConfig::OpenAI { api_key_env, .. } => Some(api_key_env),
                ProviderConfig::Claude { api_key_env, .. } => Some(api_key_env),
                ProviderConfig::Ollama { .. } => None,
            };

            if let Some(env_var) = env_var {
                if let Ok(key) = std::env::var(&env_var) {
                    return Some(key);
                }
            }
        }

        None
    }

    /// Resolve the search service API key from its configured env var.
    pub fn resolve_search_key(&self) -> Option<String> {
        std::env::var(&self.search.api_key_env).ok()
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;
        let known_providers = ["openai", "claude", "ollama"];

        if !known_providers.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                known_providers.join(", ")
            )));
        }

        // Validate provider-specific requirements
        if let Some(provider_config) = self.get_provider_config(provider) {
            match provider_config {
                ProviderConfig::OpenAI { api_key_env, .. }
                | ProviderConfig::Claude { api_key_env, .. } => {
                    if self.api_key.is_none() && std::env::var(&api_key_env).is_err() {
                        return Err(AppError::Config(format!(
                            "API key not found in environment variable: {}",
                            api_key_env
                        )));
                    }
                }
                ProviderConfig::Ollama { .. } => {
                    // Ollama doesn't require API keys
                }
            }
        }

        if self.search.endpoint.is_empty() {
            return Err(AppError::Config(
                "Search service endpoint is not configured".to_string(),
            ));
        }

        if self.search.top_k == 0 {
            return Err(AppError::Config(
                "search.topK must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
