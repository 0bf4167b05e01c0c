//! Prompt builders for Docent.
//!
//! This crate constructs the two message sequences the assistant chain
//! sends to the language model:
//! - query generation: turn the user's question into a search query
//! - retrieval QA: answer the question grounded in retrieved sources
//!
//! Both builders are pure functions of their inputs — no I/O, no retrieval,
//! no model calls. Templates are rendered with Handlebars.

pub mod query_generation;
pub mod retrieval_qa;
pub mod template;

pub use template::render_template;
