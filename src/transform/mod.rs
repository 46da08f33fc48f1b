// src/transform/mod.rs
//! Transform capability and the sequential batch runner.
//!
//! A transform consumes a whole batch of nodes and produces a whole batch:
//! it may change cardinality (a splitter fans one node out into many) or
//! enrich nodes (an embedder fills in vectors). The runner folds an ordered
//! transform list over a batch, one step at a time.

pub mod embedder;
pub mod splitter;

pub use embedder::{Embedder, EmbeddingClient, HttpEmbeddingClient};
pub use splitter::SentenceSplitter;

use crate::configured::{ConfiguredTransform, TransformKind};
use crate::error::IngestError;
use crate::model::Node;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;

/// Caller-supplied options forwarded verbatim to every transform invocation.
///
/// The runner never interprets these; `extras` is an open map for options
/// only specific transforms understand.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub show_progress: bool,
    pub extras: IndexMap<String, serde_json::Value>,
}

/// One stage of the pipeline, able to consume and produce a batch of nodes.
///
/// Implementations hold their own configuration but no pipeline identity.
#[async_trait]
pub trait Transform: Send + Sync {
    /// The public kind tag this transform registers under.
    fn kind(&self) -> TransformKind;

    /// Wire snapshot of this transform for remote registration.
    fn configured(&self) -> ConfiguredTransform;

    /// Apply the transform to a batch, blocking until done.
    fn apply(&self, batch: Vec<Node>, options: &RunOptions) -> Result<Vec<Node>, IngestError>;

    /// Asynchronous equivalent of [`apply`](Transform::apply); must produce
    /// identical output for identical input.
    async fn apply_async(
        &self,
        batch: Vec<Node>,
        options: &RunOptions,
    ) -> Result<Vec<Node>, IngestError> {
        self.apply(batch, options)
    }
}

/// Folds the transform list over the batch in strict list order.
///
/// Step i's complete output becomes step i+1's complete input; there is no
/// overlap across steps. The batch moves through the fold without copies —
/// a caller that wants to keep its original batch passes `batch.clone()`.
/// The first step error aborts the fold and propagates unmodified; effects
/// of earlier steps are not rolled back.
pub fn run_transforms(
    mut batch: Vec<Node>,
    transforms: &[Arc<dyn Transform>],
    options: &RunOptions,
) -> Result<Vec<Node>, IngestError> {
    for step in transforms {
        log::debug!(
            "applying transform '{}' to {} nodes",
            step.kind(),
            batch.len()
        );
        batch = step.apply(batch, options)?;
    }
    Ok(batch)
}

/// Asynchronous equivalent of [`run_transforms`], suspending at each step
/// boundary. Produces identical output for identical input and step list.
pub async fn run_transforms_async(
    mut batch: Vec<Node>,
    transforms: &[Arc<dyn Transform>],
    options: &RunOptions,
) -> Result<Vec<Node>, IngestError> {
    for step in transforms {
        log::debug!(
            "applying transform '{}' to {} nodes",
            step.kind(),
            batch.len()
        );
        batch = step.apply_async(batch, options).await?;
    }
    Ok(batch)
}
