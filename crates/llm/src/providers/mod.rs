//! LLM provider implementations.

pub mod mock;
pub mod ollama;

pub use mock::ScriptedClient;
pub use ollama::OllamaClient;
