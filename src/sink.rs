// src/sink.rs
//! Sink capability and an in-process vector store.
//!
//! A sink persists nodes that carry embeddings. Sinks are shared, not owned:
//! one store may back several pipelines, so implementations must tolerate
//! concurrent `add` calls.

use crate::configured::{ConfiguredDataSink, SinkKind, SinkParams, VectorStoreParams};
use crate::error::IngestError;
use crate::model::Node;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Destination for embedded nodes.
#[async_trait]
pub trait VectorSink: Send + Sync {
    /// Persists the given nodes. Callers only pass nodes with a non-empty
    /// embedding vector.
    async fn add(&self, nodes: &[Node]) -> Result<(), IngestError>;

    /// Wire snapshot of this sink for remote registration.
    fn configured(&self) -> ConfiguredDataSink;
}

/// In-process vector store, mainly for local runs and tests.
pub struct MemoryVectorStore {
    collection: String,
    records: Mutex<Vec<Node>>,
}

impl MemoryVectorStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Snapshot of the stored nodes, in insertion order.
    pub fn records(&self) -> Vec<Node> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl VectorSink for MemoryVectorStore {
    async fn add(&self, nodes: &[Node]) -> Result<(), IngestError> {
        if let Some(bad) = nodes.iter().find(|n| !n.has_embedding()) {
            return Err(IngestError::Transform(format!(
                "node {} reached the vector store without an embedding",
                bad.id
            )));
        }
        let mut records = self.records.lock();
        records.extend_from_slice(nodes);
        log::debug!(
            "vector store '{}': {} nodes added, {} total",
            self.collection,
            nodes.len(),
            records.len()
        );
        Ok(())
    }

    fn configured(&self) -> ConfiguredDataSink {
        ConfiguredDataSink {
            name: format!("vector-store-{}", self.collection),
            kind: SinkKind::VectorStore,
            params: SinkParams::VectorStore(VectorStoreParams {
                collection: self.collection.clone(),
            }),
        }
    }
}
