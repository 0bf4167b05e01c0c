//! LLM integration crate for Docent.
//!
//! This crate provides a provider-agnostic abstraction for chat-based
//! Large Language Models. Providers accept ordered role-tagged message
//! sequences through a unified trait-based interface, with both
//! non-streaming and streaming completion calls.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Scripted mock**: deterministic playback for tests
//!
//! # Example
//! ```no_run
//! use docent_llm::{ChatMessage, ChatRequest, LlmClient, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = ChatRequest::new(vec![ChatMessage::user("Hello, world!")], "llama3.2");
//! let response = client.chat(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{
    ChatMessage, ChatRequest, ChatResponse, ChatStream, ChatStreamChunk, LlmClient, LlmUsage, Role,
};
pub use factory::create_client;
pub use providers::{OllamaClient, ScriptedClient};
