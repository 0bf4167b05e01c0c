//! Query embedding support.
//!
//! Provides provider-agnostic embedding generation for the vector half of
//! hybrid search. Only the query path lives here; document embeddings are
//! written by the external indexer.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
