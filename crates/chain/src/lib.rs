//! Retrieval-augmented generation chain for Docent.
//!
//! This crate orchestrates one conversational turn end to end:
//! 1. reformulate the user question into a search query
//! 2. retrieve the top-K documents for that query
//! 3. generate an answer grounded in those documents
//! 4. post-process the answer into citations and follow-up questions
//!
//! Callers persist conversation history and re-supply it on the next turn;
//! the chain itself keeps no state between requests.

pub mod chain;
pub mod message;
pub mod postprocess;

// Re-export main types
pub use chain::{AssistantChain, ChainRequest, ChainResponse, TokenSink};
pub use docent_core::config::DEFAULT_TOP_K;
pub use message::{AssistantReply, Message};
