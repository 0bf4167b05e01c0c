//! Retrieved document types.

use serde::{Deserialize, Serialize};

/// A knowledge chunk retrieved from the search store.
///
/// Documents are owned by the store; the chain holds only transient
/// references during a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier, typically the originating filename
    pub source_id: String,

    /// Chunk content
    pub text: String,

    /// Arbitrary additional metadata (JSON object, keys unique)
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach metadata to the document.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_construction() {
        let doc = Document::new("philosophy.md", "Transformers is opinionated.")
            .with_metadata(json!({"start_index": 0}));

        assert_eq!(doc.source_id, "philosophy.md");
        assert_eq!(doc.metadata["start_index"], 0);
    }

    #[test]
    fn test_document_serde_roundtrip() {
        let doc = Document::new("index.md", "chunk text");
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
