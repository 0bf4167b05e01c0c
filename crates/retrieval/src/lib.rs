//! Document retrieval crate for Docent.
//!
//! This crate provides the read-only retrieval seam over the document
//! corpus:
//! - `Document`: a retrieved knowledge chunk
//! - `Retriever`: the search capability trait
//! - `SearchClient`: hybrid lexical+vector search over the REST service
//! - embedding providers for the query vector
//!
//! Index population is an external batch process; nothing here writes to
//! the store.

pub mod document;
pub mod embeddings;
pub mod retriever;
pub mod search;

// Re-export main types
pub use document::Document;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use retriever::Retriever;
pub use search::SearchClient;
