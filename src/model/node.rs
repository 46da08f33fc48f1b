use super::{Document, Metadata};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// How one node relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// The document or node this node was derived from
    Source,
    Previous,
    Next,
    Parent,
    Child,
}

/// A directed relationship from the owning node to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationKind,
    pub target: NodeId,
}

/// The smallest granule of content flowing through the pipeline.
///
/// Nodes start out without an embedding; an embedding transform fills the
/// vector in. Only nodes with a non-empty vector are eligible for sink writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Node {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: NodeId::new_v4(),
            content: content.into(),
            metadata: Metadata::new(),
            embedding: None,
            relationships: Vec::new(),
        }
    }

    /// Wraps a document as the root node of its split tree.
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.retag(),
            content: document.text.clone(),
            metadata: document.metadata.clone(),
            embedding: None,
            relationships: vec![Relationship {
                kind: RelationKind::Source,
                target: document.id.retag(),
            }],
        }
    }

    pub fn with_relationship(mut self, kind: RelationKind, target: NodeId) -> Self {
        self.relationships.push(Relationship { kind, target });
        self
    }

    /// Whether this node carries a usable embedding vector.
    ///
    /// An embedded node always has a non-empty vector; a `Some(vec![])`
    /// would be a backend bug and is treated the same as no embedding.
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// The target of this node's `Source` relationship, if any.
    pub fn source_id(&self) -> Option<&NodeId> {
        self.relationships
            .iter()
            .find(|r| r.kind == RelationKind::Source)
            .map(|r| &r.target)
    }
}
