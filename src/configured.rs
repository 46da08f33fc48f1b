// src/configured.rs
//! Serializable snapshots of live pipeline components.
//!
//! Remote registration cannot ship trait objects, so every transform, data
//! source, and data sink is described by a `(kind, params)` pair: a string
//! vocabulary of known component kinds with an `Unknown` variant for forward
//! compatibility, and a typed parameter record per known kind. Parameter
//! records are wire shapes — runtime handles and credentials never appear in
//! them, so there is nothing to scrub before transmission.

use crate::model::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;
use std::path::PathBuf;

macro_rules! kind_vocabulary {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            /// A component kind this build doesn't recognize yet
            Unknown(String),
        }

        impl $name {
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($tag => Self::$variant,)+
                    other => Self::Unknown(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Unknown(name) => name,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let name = String::deserialize(deserializer)?;
                Ok(Self::from_name(&name))
            }
        }
    };
}

kind_vocabulary!(TransformKind {
    SentenceSplitter => "sentence_splitter",
    RemoteEmbedding => "remote_embedding",
});

kind_vocabulary!(SourceKind {
    Reader => "reader",
    Document => "document",
});

kind_vocabulary!(SinkKind {
    VectorStore => "vector_store",
});

/// Wire parameters for the sentence splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceSplitterParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Wire parameters for the remote embedding step.
///
/// The live embedder also holds an API key and HTTP clients; those are
/// runtime-only and have no wire counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEmbeddingParams {
    pub model: String,
    pub endpoint: String,
    pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformParams {
    SentenceSplitter(SentenceSplitterParams),
    RemoteEmbedding(RemoteEmbeddingParams),
    Unknown(JsonMap<String, JsonValue>),
}

/// Wire parameters for a filesystem reader source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryReaderParams {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub recursive: bool,
}

/// Wire parameters for a single-document source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSourceParams {
    pub document: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceParams {
    Reader(DirectoryReaderParams),
    Document(DocumentSourceParams),
    Unknown(JsonMap<String, JsonValue>),
}

/// Wire parameters for a vector-store sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreParams {
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SinkParams {
    VectorStore(VectorStoreParams),
    Unknown(JsonMap<String, JsonValue>),
}

/// Snapshot of one transform step, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredTransform {
    pub kind: TransformKind,
    pub params: TransformParams,
}

/// Snapshot of one data source submitted for remote ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredDataSource {
    pub name: String,
    pub kind: SourceKind,
    pub params: SourceParams,
}

impl ConfiguredDataSource {
    /// One source entry per document — documents are never batched.
    pub fn from_document(document: &Document) -> Self {
        Self {
            name: format!("document-{}", document.id),
            kind: SourceKind::Document,
            params: SourceParams::Document(DocumentSourceParams {
                document: document.clone(),
            }),
        }
    }
}

/// Snapshot of the data sink that receives embedded nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredDataSink {
    pub name: String,
    pub kind: SinkKind,
    pub params: SinkParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transform_kind_string_vocabulary() {
        assert_eq!(
            TransformKind::from_name("sentence_splitter"),
            TransformKind::SentenceSplitter
        );
        assert_eq!(TransformKind::RemoteEmbedding.as_str(), "remote_embedding");
        assert_eq!(
            TransformKind::from_name("reranker"),
            TransformKind::Unknown("reranker".into())
        );
    }

    #[test]
    fn configured_transform_wire_shape() {
        let snapshot = ConfiguredTransform {
            kind: TransformKind::SentenceSplitter,
            params: TransformParams::SentenceSplitter(SentenceSplitterParams {
                chunk_size: 512,
                chunk_overlap: 1,
            }),
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "sentence_splitter",
                "params": { "chunk_size": 512, "chunk_overlap": 1 }
            })
        );
    }

    #[test]
    fn unknown_transform_round_trips() {
        let raw = json!({
            "kind": "reranker",
            "params": { "top_k": 5 }
        });
        let parsed: ConfiguredTransform = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.kind, TransformKind::Unknown("reranker".into()));
        assert!(matches!(parsed.params, TransformParams::Unknown(_)));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn document_source_carries_the_document() {
        let doc = Document::new("payload");
        let source = ConfiguredDataSource::from_document(&doc);
        assert_eq!(source.kind, SourceKind::Document);
        assert_eq!(source.name, format!("document-{}", doc.id));
        match source.params {
            SourceParams::Document(params) => assert_eq!(params.document, doc),
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn sink_params_round_trip() {
        let sink = ConfiguredDataSink {
            name: "primary".into(),
            kind: SinkKind::VectorStore,
            params: SinkParams::VectorStore(VectorStoreParams {
                collection: "events".into(),
            }),
        };
        let value = serde_json::to_value(&sink).unwrap();
        let back: ConfiguredDataSink = serde_json::from_value(value).unwrap();
        assert_eq!(back, sink);
    }
}
