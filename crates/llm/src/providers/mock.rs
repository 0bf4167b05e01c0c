//! Scripted mock LLM provider for testing and development.

use crate::client::{
    ChatRequest, ChatResponse, ChatStream, ChatStreamChunk, LlmClient, LlmUsage,
};
use docent_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock provider returning scripted replies in order.
///
/// Each `chat`/`chat_stream` call consumes the next scripted reply and
/// records the request it received, so tests can assert both the prompts
/// sent and the order of provider calls. An exhausted script yields a
/// generation error, which doubles as a way to test failure propagation.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    /// Create a client that plays back the given replies in order.
    pub fn new(replies: Vec<impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a client whose every call fails (empty script).
    pub fn failing() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn next_reply(&self, request: &ChatRequest) -> AppResult<String> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .ok_or_else(|| AppError::Generation("scripted replies exhausted".to_string()))
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let content = self.next_reply(request)?;

        Ok(ChatResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
            done: true,
        })
    }

    async fn chat_stream(&self, request: &ChatRequest) -> AppResult<ChatStream> {
        let content = self.next_reply(request)?;
        let model = request.model.clone();

        // Emit the reply in small fragments followed by a done marker, the
        // same shape a real provider produces.
        let mut chunks: Vec<AppResult<ChatStreamChunk>> = fragment(&content, 8)
            .into_iter()
            .map(|piece| {
                Ok(ChatStreamChunk {
                    content: piece,
                    model: model.clone(),
                    done: false,
                    usage: None,
                })
            })
            .collect();

        chunks.push(Ok(ChatStreamChunk {
            content: String::new(),
            model,
            done: true,
            usage: Some(LlmUsage::default()),
        }));

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// Split text into pieces of at most `size` characters on char boundaries.
fn fragment(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let client = ScriptedClient::new(vec!["first", "second"]);
        let request = ChatRequest::new(vec![ChatMessage::user("q")], "mock-model");

        assert_eq!(client.chat(&request).await.unwrap().content, "first");
        assert_eq!(client.chat(&request).await.unwrap().content, "second");
        assert!(client.chat(&request).await.is_err());
        assert_eq!(client.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_stream_reassembles_reply() {
        let client = ScriptedClient::new(vec!["a reply long enough to fragment"]);
        let request = ChatRequest::new(vec![ChatMessage::user("q")], "mock-model");

        let mut stream = client.chat_stream(&request).await.unwrap();
        let mut assembled = String::new();
        let mut saw_done = false;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            assembled.push_str(&chunk.content);
            if chunk.done {
                saw_done = true;
            }
        }

        assert_eq!(assembled, "a reply long enough to fragment");
        assert!(saw_done);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = ScriptedClient::failing();
        let request = ChatRequest::new(vec![ChatMessage::user("q")], "mock-model");
        let err = client.chat(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn test_fragment_boundaries() {
        assert_eq!(fragment("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(fragment("", 4).is_empty());
    }
}
