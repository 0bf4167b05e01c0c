//! Retrieval-augmented assistant chain.
//!
//! Sequences query generation, document retrieval, grounded-answer
//! generation and post-processing into a single request/response contract.
//! The chain holds only its two collaborators; every request is processed
//! with fresh state, so one chain instance serves concurrent requests.

use crate::message::{AssistantReply, Message};
use crate::postprocess;
use docent_core::config::DEFAULT_TOP_K;
use docent_core::AppResult;
use docent_llm::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmUsage};
use docent_prompt::{query_generation, retrieval_qa};
use docent_retrieval::{Document, Retriever};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback receiving incremental answer fragments during generation.
///
/// Invoked zero or more times, in token order, strictly before `run`
/// returns; never invoked concurrently with itself.
pub type TokenSink = Box<dyn FnMut(&str) + Send>;

/// A single assistant invocation.
pub struct ChainRequest {
    /// Current user question
    pub input: String,

    /// Prior conversation turns, oldest first
    pub history: Vec<Message>,

    /// Optional sink for streaming answer fragments
    pub sink: Option<TokenSink>,
}

impl ChainRequest {
    /// Create a request with no history and no streaming sink.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            history: Vec::new(),
            sink: None,
        }
    }

    /// Supply the prior conversation.
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    /// Stream answer fragments into the given sink.
    pub fn with_sink(mut self, sink: TokenSink) -> Self {
        self.sink = Some(sink);
        self
    }
}

/// Everything produced by one chain invocation.
#[derive(Debug, Clone)]
pub struct ChainResponse {
    /// Generated search query
    pub query: String,

    /// Retrieved documents indexed by source id (last write wins on
    /// duplicate ids)
    pub documents: HashMap<String, Document>,

    /// The exact prompt sent for answer generation
    pub messages: Vec<ChatMessage>,

    /// Raw provider response for the answer generation call
    pub raw_response: ChatResponse,

    /// The assistant turn to append to the conversation
    pub reply: AssistantReply,

    /// Follow-up questions extracted from the raw reply
    pub follow_ups: Vec<String>,

    /// Documents actually cited in the reply, in first-appearance order
    pub citations: Vec<Document>,
}

/// Retrieval-augmented document assistant.
///
/// Collaborators are injected once at construction; both must be safe for
/// concurrent use by multiple in-flight requests.
pub struct AssistantChain {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    model: String,
    top_k: usize,
}

impl AssistantChain {
    /// Create a chain with the default retrieval depth.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            retriever,
            model: model.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the number of documents retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Generate a search query from the input question.
    async fn generate_search_query(&self, input: &str) -> AppResult<String> {
        let messages = query_generation::build_messages(input)?;
        let request = ChatRequest::new(messages, &self.model);
        let response = self.llm.chat(&request).await?;

        Ok(response.content)
    }

    /// Generate the grounded answer, streaming through the sink if one was
    /// supplied.
    async fn generate_answer(
        &self,
        messages: Vec<ChatMessage>,
        sink: &mut Option<TokenSink>,
    ) -> AppResult<ChatResponse> {
        let request = ChatRequest::new(messages, &self.model);

        let Some(sink) = sink else {
            return self.llm.chat(&request).await;
        };

        let request = request.with_streaming();
        let mut stream = self.llm.chat_stream(&request).await?;

        let mut content = String::new();
        let mut model = self.model.clone();
        let mut usage = LlmUsage::default();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            if !chunk.content.is_empty() {
                sink(&chunk.content);
                content.push_str(&chunk.content);
            }

            model = chunk.model;

            if chunk.done {
                if let Some(final_usage) = chunk.usage {
                    usage = final_usage;
                }
                break;
            }
        }

        Ok(ChatResponse {
            content,
            model,
            usage,
            done: true,
        })
    }

    /// Run the full chain for one request.
    ///
    /// Any failure during query generation, retrieval or answer generation
    /// aborts the whole call — no partial response is returned. The
    /// post-processing steps never fail; a malformed reply simply yields
    /// empty citations and follow-ups.
    pub async fn run(&self, request: ChainRequest) -> AppResult<ChainResponse> {
        let ChainRequest {
            input,
            history,
            mut sink,
        } = request;

        // Generate search query from input question
        tracing::info!("Generating search query for input: {}", input);
        let query = self.generate_search_query(&input).await?;

        // Retrieve relevant documents from search query
        tracing::info!("Running search query: {}", query);
        let retrieved = self.retriever.search(&query, self.top_k).await?;

        // Generate Q&A prompt from input question, retrieved documents and
        // chat history
        tracing::info!("Running Q&A");
        let history_messages: Vec<ChatMessage> =
            history.iter().map(Message::to_chat_message).collect();
        let messages = retrieval_qa::build_messages(&input, &history_messages, &retrieved)?;

        let raw_response = self.generate_answer(messages.clone(), &mut sink).await?;
        let raw_reply = raw_response.content.clone();

        // Resolve citations against the retrieved documents; keys not found
        // among them are silently dropped
        tracing::info!("Extracting citations");
        let documents: HashMap<String, Document> = retrieved
            .into_iter()
            .map(|doc| (doc.source_id.clone(), doc))
            .collect();

        let citations: Vec<Document> = postprocess::extract_citations(&raw_reply)
            .into_iter()
            .filter_map(|key| documents.get(&key).cloned())
            .collect();

        tracing::info!("Extracting follow ups");
        let follow_ups = postprocess::extract_follow_ups(&raw_reply);

        // Clean up the reply: strip follow-ups first so citation markup
        // keeps its positions, then renumber citations
        tracing::info!("Stripping reply");
        let citation_keys: Vec<String> = citations
            .iter()
            .map(|doc| doc.source_id.clone())
            .collect();
        let formatted_content = postprocess::replace_citations(
            &postprocess::strip_follow_ups(&raw_reply),
            &citation_keys,
        );

        let reply = AssistantReply {
            content: raw_reply,
            formatted_content,
            follow_ups: follow_ups.clone(),
            citations: citations.clone(),
        };

        Ok(ChainResponse {
            query,
            documents,
            messages,
            raw_response,
            reply,
            follow_ups,
            citations,
        })
    }
}
