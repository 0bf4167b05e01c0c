//! Hybrid search-service client.
//!
//! This module implements `Retriever` against the document search service's
//! REST API. A query is sent as text plus its embedding vector in a single
//! request; the service performs hybrid lexical+vector ranking and returns
//! hits in ranking order. The index schema is owned by the external indexer
//! (string key `id`, searchable `content`, float-vector `content_vector`,
//! searchable `metadata` and `source` fields).

use crate::document::Document;
use crate::embeddings::EmbeddingProvider;
use crate::retriever::Retriever;
use docent_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// REST API version pinned for the search service.
const API_VERSION: &str = "2023-11-01";

/// Vector field of the index schema queried for similarity.
const VECTOR_FIELD: &str = "content_vector";

/// Fields requested back from the index.
const SELECT_FIELDS: &str = "id,content,source,metadata";

/// Search API request format.
#[derive(Debug, Serialize)]
struct SearchRequest {
    search: String,
    vectors: Vec<VectorQuery>,
    top: usize,
    select: String,
}

/// A single vector sub-query for hybrid ranking.
#[derive(Debug, Serialize)]
struct VectorQuery {
    value: Vec<f32>,
    fields: String,
    k: usize,
}

/// Search API response format.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<SearchHit>,
}

/// A single ranked hit from the index.
#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "@search.score", default)]
    score: f32,

    #[serde(default)]
    id: String,

    #[serde(default)]
    content: String,

    #[serde(default)]
    source: String,

    /// Stringified JSON written by the indexer
    #[serde(default)]
    metadata: Option<String>,
}

/// Client for the hybrid document search service.
///
/// The query embedding is computed client-side through the injected
/// `EmbeddingProvider` and shipped with the query text; ranking itself is a
/// service-side contract, opaque to callers.
pub struct SearchClient {
    /// Search service base URL
    endpoint: String,

    /// Index name to query
    index: String,

    /// API key sent with each request, if the service requires one
    api_key: Option<String>,

    /// Embedding provider for the vector half of hybrid search
    embedder: Arc<dyn EmbeddingProvider>,

    /// HTTP client
    client: reqwest::Client,
}

impl SearchClient {
    /// Create a new search client.
    pub fn new(
        endpoint: impl Into<String>,
        index: impl Into<String>,
        api_key: Option<String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            index: index.into(),
            api_key,
            embedder,
            client: reqwest::Client::new(),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.index,
            API_VERSION
        )
    }

    fn to_search_request(&self, query: &str, vector: Vec<f32>, k: usize) -> SearchRequest {
        SearchRequest {
            search: query.to_string(),
            vectors: vec![VectorQuery {
                value: vector,
                fields: VECTOR_FIELD.to_string(),
                k,
            }],
            top: k,
            select: SELECT_FIELDS.to_string(),
        }
    }
}

/// Convert a ranked hit into a `Document`.
fn to_document(hit: SearchHit) -> Document {
    let metadata = hit
        .metadata
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(serde_json::Value::Null);

    Document {
        source_id: hit.source,
        text: hit.content,
        metadata,
    }
}

#[async_trait::async_trait]
impl Retriever for SearchClient {
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<Document>> {
        tracing::info!("Searching index '{}' for top {} documents", self.index, k);
        tracing::debug!("Search query: {}", query);

        let vector = self.embedder.embed(query).await?;
        let request = self.to_search_request(query, vector, k);

        let mut http_request = self.client.post(self.search_url()).json(&request);
        if let Some(ref key) = self.api_key {
            http_request = http_request.header("api-key", key);
        }

        let response = http_request.send().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to reach search service: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Search service error ({}): {}",
                status, error_text
            )));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to parse search response: {}", e))
        })?;

        if let Some(best) = search_response.value.first() {
            tracing::debug!(
                "Top hit '{}' (id: {}, score: {:.3})",
                best.source,
                best.id,
                best.score
            );
        }

        // Ranking order is the service's contract; do not re-sort
        Ok(search_response.value.into_iter().map(to_document).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::MockProvider;

    fn test_client() -> SearchClient {
        SearchClient::new(
            "https://search.example.net/",
            "corpus",
            Some("secret".to_string()),
            Arc::new(MockProvider::new(8)),
        )
    }

    #[test]
    fn test_search_url() {
        let client = test_client();
        assert_eq!(
            client.search_url(),
            format!(
                "https://search.example.net/indexes/corpus/docs/search?api-version={}",
                API_VERSION
            )
        );
    }

    #[test]
    fn test_search_request_shape() {
        let client = test_client();
        let request = client.to_search_request("health plan cardio", vec![0.1, 0.2], 5);

        assert_eq!(request.search, "health plan cardio");
        assert_eq!(request.top, 5);
        assert_eq!(request.vectors.len(), 1);
        assert_eq!(request.vectors[0].fields, VECTOR_FIELD);
        assert_eq!(request.vectors[0].k, 5);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["select"], SELECT_FIELDS);
        assert_eq!(body["vectors"][0]["value"][1], 0.2);
    }

    #[test]
    fn test_to_document_parses_metadata() {
        let hit = SearchHit {
            score: 0.9,
            id: "chunk-1".to_string(),
            content: "chunk text".to_string(),
            source: "philosophy.md".to_string(),
            metadata: Some(r#"{"start_index": 40}"#.to_string()),
        };

        let doc = to_document(hit);
        assert_eq!(doc.source_id, "philosophy.md");
        assert_eq!(doc.text, "chunk text");
        assert_eq!(doc.metadata["start_index"], 40);
    }

    #[test]
    fn test_to_document_tolerates_bad_metadata() {
        let hit = SearchHit {
            score: 0.1,
            id: "chunk-2".to_string(),
            content: "text".to_string(),
            source: "index.md".to_string(),
            metadata: Some("not json".to_string()),
        };

        let doc = to_document(hit);
        assert_eq!(doc.metadata, serde_json::Value::Null);
    }

    #[test]
    fn test_hit_deserialization() {
        let raw = r#"{
            "@search.score": 1.5,
            "id": "c1",
            "content": "body",
            "source": "doc.md",
            "metadata": "{}"
        }"#;

        let hit: SearchHit = serde_json::from_str(raw).unwrap();
        assert_eq!(hit.score, 1.5);
        assert_eq!(hit.source, "doc.md");
    }
}
