//! LLM client abstraction and chat message types.
//!
//! This module defines the core abstractions for interacting with chat-based
//! LLM providers. Providers accept an ordered sequence of role-tagged
//! messages and return a single completion, optionally streamed.

use docent_core::AppResult;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Get the canonical role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// LLM chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered message sequence to send
    pub messages: Vec<ChatMessage>,

    /// Model identifier (e.g., "llama3.2", "gpt-4")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Enable streaming responses
    #[serde(default)]
    pub stream: bool,
}

impl ChatRequest {
    /// Create a new chat request with required fields.
    pub fn new(messages: Vec<ChatMessage>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            max_tokens: None,
            temperature: None,
            stream: false,
        }
    }

    /// Enable streaming for this request.
    pub fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// LLM chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: LlmUsage,

    /// Whether the response was complete
    #[serde(default = "default_true")]
    pub done: bool,
}

fn default_true() -> bool {
    true
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A chunk from a streaming LLM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    /// Incremental text content
    pub content: String,

    /// Model generating the stream
    pub model: String,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,

    /// Usage statistics (only in final chunk)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
}

/// Stream of chat chunks.
pub type ChatStream = Pin<Box<dyn Stream<Item = AppResult<ChatStreamChunk>> + Send>>;

/// Trait for chat-based LLM providers.
///
/// This trait abstracts the underlying provider (Ollama, OpenAI, Claude,
/// etc.) behind a unified message-in, completion-out interface.
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "ollama", "openai").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming chat completion.
    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse>;

    /// Perform a streaming chat completion.
    ///
    /// Chunks are yielded in token order; the final chunk has `done` set
    /// and may carry usage statistics.
    async fn chat_stream(&self, request: &ChatRequest) -> AppResult<ChatStream>;
}
