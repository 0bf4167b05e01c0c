//! Ollama LLM provider implementation.
//!
//! This module provides integration with Ollama, a local LLM runtime, via
//! its chat endpoint. Ollama API:
//! https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{
    ChatRequest, ChatResponse, ChatStream, ChatStreamChunk, LlmClient, LlmUsage,
};
use docent_core::{AppError, AppResult};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// Ollama chat API request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

/// Sampling options accepted by Ollama.
#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// A role-tagged message in Ollama's wire format.
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

/// Ollama chat API response format.
///
/// Streaming responses are newline-delimited objects of the same shape;
/// the final object carries `done: true` and the token counts.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    #[serde(default)]
    message: Option<OllamaMessage>,
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama chat client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:11434")
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert ChatRequest to Ollama wire format.
    fn to_ollama_request(&self, request: &ChatRequest) -> OllamaChatRequest {
        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        OllamaChatRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            options,
            stream: request.stream,
        }
    }

    /// Convert Ollama response to ChatResponse.
    fn convert_response(&self, response: OllamaChatResponse) -> ChatResponse {
        let usage = LlmUsage::new(
            response.prompt_eval_count.unwrap_or(0),
            response.eval_count.unwrap_or(0),
        );

        ChatResponse {
            content: response.message.map(|m| m.content).unwrap_or_default(),
            model: response.model,
            usage,
            done: response.done,
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!("Sending chat request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let mut ollama_request = self.to_ollama_request(request);
        ollama_request.stream = false;
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        // For non-streaming, Ollama returns a single JSON object
        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::info!("Received chat completion from Ollama");

        Ok(self.convert_response(ollama_response))
    }

    async fn chat_stream(&self, request: &ChatRequest) -> AppResult<ChatStream> {
        tracing::info!("Starting streaming chat request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let mut ollama_request = self.to_ollama_request(request);
        ollama_request.stream = true;

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to send streaming request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        // Ollama sends newline-delimited JSON objects
        let stream = response.bytes_stream().map(move |result| {
            let bytes =
                result.map_err(|e| AppError::Generation(format!("Stream error: {}", e)))?;

            let text = String::from_utf8_lossy(&bytes);
            let chunks: Vec<AppResult<ChatStreamChunk>> = text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| {
                    let ollama_response: OllamaChatResponse =
                        serde_json::from_str(line).map_err(|e| {
                            AppError::Generation(format!("Failed to parse chunk: {}", e))
                        })?;

                    Ok(ChatStreamChunk {
                        content: ollama_response
                            .message
                            .map(|m| m.content)
                            .unwrap_or_default(),
                        model: ollama_response.model,
                        done: ollama_response.done,
                        usage: if ollama_response.done {
                            Some(LlmUsage::new(
                                ollama_response.prompt_eval_count.unwrap_or(0),
                                ollama_response.eval_count.unwrap_or(0),
                            ))
                        } else {
                            None
                        },
                    })
                })
                .collect();

            Ok(futures::stream::iter(chunks))
        });

        Ok(Box::pin(stream.flat_map(|result| match result {
            Ok(chunks) => chunks,
            Err(e) => futures::stream::iter(vec![Err(e)]),
        })))
    }
}
