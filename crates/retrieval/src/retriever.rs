//! Retriever trait for document search.

use crate::document::Document;
use docent_core::AppResult;

/// Retrieval interface over the document index.
///
/// Implementations rank results themselves (the production store uses a
/// hybrid lexical+vector strategy); callers must not re-sort. The access
/// pattern is read-only — indexing is an external batch process.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Search the index, returning at most `k` documents in ranking order.
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticRetriever {
        documents: Vec<Document>,
    }

    #[async_trait::async_trait]
    impl Retriever for StaticRetriever {
        async fn search(&self, _query: &str, k: usize) -> AppResult<Vec<Document>> {
            Ok(self.documents.iter().take(k).cloned().collect())
        }
    }

    #[tokio::test]
    async fn test_static_retriever_respects_k() {
        let retriever = StaticRetriever {
            documents: vec![
                Document::new("a.md", "a"),
                Document::new("b.md", "b"),
                Document::new("c.md", "c"),
            ],
        };

        let results = retriever.search("anything", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source_id, "a.md");
    }
}
