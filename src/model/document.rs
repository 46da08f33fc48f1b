use super::Metadata;
use crate::types::DocumentId;
use serde::{Deserialize, Serialize};

/// A raw input item prior to node-level splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new_v4(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_get_distinct_ids() {
        let a = Document::new("alpha");
        let b = Document::new("alpha");
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn metadata_keeps_insertion_order() {
        let doc = Document::new("x")
            .with_metadata("source", serde_json::json!("disk"))
            .with_metadata("page", serde_json::json!(3));
        let keys: Vec<_> = doc.metadata.keys().cloned().collect();
        assert_eq!(keys, vec!["source", "page"]);
    }
}
