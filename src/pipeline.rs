// src/pipeline.rs
//! The ingestion pipeline: an ordered transform list over documents, with a
//! local execution path and a remote registration path.
//!
//! A pipeline is assembled once via [`IngestionPipelineBuilder`] and then
//! driven through [`run_local`](IngestionPipeline::run_local),
//! [`register`](IngestionPipeline::register), or
//! [`run_remote`](IngestionPipeline::run_remote).

use crate::config::{PlatformConfig, DEFAULT_PIPELINE_NAME};
use crate::configured::{ConfiguredDataSource, ConfiguredTransform};
use crate::error::IngestError;
use crate::model::{Document, Node};
use crate::platform::{PipelineCreate, PlatformApi};
use crate::reader::DocumentReader;
use crate::sink::VectorSink;
use crate::transform::{
    run_transforms_async, Embedder, EmbeddingClient, HttpEmbeddingClient, RunOptions,
    SentenceSplitter, Transform,
};
use crate::types::{ExecutionId, RemotePipelineId};
use std::sync::Arc;

/// An ingestion pipeline that can be applied to data locally or registered
/// for remote execution.
///
/// The transform list and its wire snapshots are derived together at build
/// time and stay index-aligned for the pipeline's lifetime.
pub struct IngestionPipeline {
    name: String,
    config: PlatformConfig,
    transforms: Vec<Arc<dyn Transform>>,
    configured_transforms: Vec<ConfiguredTransform>,
    documents: Option<Vec<Document>>,
    reader: Option<Arc<dyn DocumentReader>>,
    sink: Option<Arc<dyn VectorSink>>,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("transforms_len", &self.transforms.len())
            .field("configured_transforms", &self.configured_transforms)
            .field("documents", &self.documents)
            .field("reader", &self.reader.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Builder for [`IngestionPipeline`].
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    name: Option<String>,
    config: Option<PlatformConfig>,
    transforms: Vec<Arc<dyn Transform>>,
    embedding_client: Option<Arc<dyn EmbeddingClient>>,
    documents: Option<Vec<Document>>,
    reader: Option<Arc<dyn DocumentReader>>,
    sink: Option<Arc<dyn VectorSink>>,
}

impl IngestionPipelineBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn platform_config(mut self, config: PlatformConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn transforms(mut self, transforms: Vec<Arc<dyn Transform>>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Backend used by the default embedding step when no transform list is
    /// supplied. Without one, the default embedder resolves from the
    /// environment.
    pub fn embedding_client(mut self, client: Arc<dyn EmbeddingClient>) -> Self {
        self.embedding_client = Some(client);
        self
    }

    pub fn documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn VectorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validates the configuration and derives the transform snapshots.
    ///
    /// Requires documents, a reader, or both. An empty transform list falls
    /// back to the default pair: a sentence splitter followed by the
    /// environment-configured remote embedder.
    pub fn build(self) -> Result<IngestionPipeline, IngestError> {
        if self.documents.is_none() && self.reader.is_none() {
            return Err(IngestError::MissingConfiguration(
                "pipeline requires documents or a reader".to_string(),
            ));
        }

        let transforms = if self.transforms.is_empty() {
            default_transforms(self.embedding_client)?
        } else {
            self.transforms
        };

        let configured_transforms: Vec<ConfiguredTransform> =
            transforms.iter().map(|t| t.configured()).collect();
        debug_assert_eq!(transforms.len(), configured_transforms.len());

        Ok(IngestionPipeline {
            name: self.name.unwrap_or_else(|| DEFAULT_PIPELINE_NAME.to_string()),
            config: self.config.unwrap_or_default(),
            transforms,
            configured_transforms,
            documents: self.documents,
            reader: self.reader,
            sink: self.sink,
        })
    }
}

/// The default transform pair substituted for an empty transform list.
fn default_transforms(
    embedding_client: Option<Arc<dyn EmbeddingClient>>,
) -> Result<Vec<Arc<dyn Transform>>, IngestError> {
    let client = match embedding_client {
        Some(client) => client,
        None => Arc::new(HttpEmbeddingClient::from_env()?),
    };
    Ok(vec![
        Arc::new(SentenceSplitter::default()),
        Arc::new(Embedder::new(client)),
    ])
}

impl IngestionPipeline {
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pipeline's document collection, if it has one.
    pub fn documents(&self) -> Option<&[Document]> {
        self.documents.as_deref()
    }

    /// Wire snapshots, index-aligned with the live transform list.
    pub fn configured_transforms(&self) -> &[ConfiguredTransform] {
        &self.configured_transforms
    }

    pub fn transform_count(&self) -> usize {
        self.transforms.len()
    }

    /// All documents as nodes: the collection first, then whatever the
    /// reader currently yields. Entries are concatenated, never deduplicated.
    fn assemble_input(&self) -> Result<Vec<Node>, IngestError> {
        let mut input: Vec<Node> = Vec::new();
        if let Some(documents) = &self.documents {
            input.extend(documents.iter().map(Node::from_document));
        }
        if let Some(reader) = &self.reader {
            let read = reader.read()?;
            input.extend(read.iter().map(Node::from_document));
        }
        Ok(input)
    }

    /// Runs the transform list over the assembled input in-process.
    ///
    /// If a sink is configured, every resulting node with an embedding is
    /// written to it; nodes without one are skipped silently. The returned
    /// batch always contains all nodes, skipped ones included.
    pub async fn run_local(&self, options: &RunOptions) -> Result<Vec<Node>, IngestError> {
        let input = self.assemble_input()?;
        log::info!(
            "pipeline '{}': running {} transforms over {} input nodes",
            self.name,
            self.transforms.len(),
            input.len()
        );

        let nodes = run_transforms_async(input, &self.transforms, options).await?;

        if let Some(sink) = &self.sink {
            let embedded: Vec<Node> = nodes.iter().filter(|n| n.has_embedding()).cloned().collect();
            log::info!(
                "pipeline '{}': writing {} of {} nodes to sink",
                self.name,
                embedded.len(),
                nodes.len()
            );
            sink.add(&embedded).await?;
        }

        Ok(nodes)
    }

    /// Drains a non-remote reader into the document collection.
    ///
    /// Appends to the existing collection (adopting the read result when no
    /// collection exists yet) and returns how many documents were merged.
    /// Never deduplicates: repeated calls re-read and re-append. A missing
    /// or remote-fetchable reader merges nothing.
    pub fn absorb_reader(&mut self) -> Result<usize, IngestError> {
        let Some(reader) = &self.reader else {
            return Ok(0);
        };
        if reader.is_remote() {
            return Ok(0);
        }
        let read = reader.read()?;
        let merged = read.len();
        match &mut self.documents {
            Some(documents) => documents.extend(read),
            None => self.documents = Some(read),
        }
        log::debug!(
            "pipeline '{}': absorbed {} documents from reader",
            self.name,
            merged
        );
        Ok(merged)
    }

    /// Registers this pipeline with the platform and returns its remote
    /// identifier.
    ///
    /// Idempotent on the platform side, keyed by (project, pipeline name).
    /// Locally it is not: a non-remote reader is drained into the document
    /// collection on every call (see [`absorb_reader`](Self::absorb_reader)).
    pub async fn register(
        &mut self,
        client: &dyn PlatformApi,
        project_name: &str,
        verbose: bool,
    ) -> Result<RemotePipelineId, IngestError> {
        let configured_transforms = self.configured_transforms.clone();

        let mut data_sinks = Vec::new();
        if let Some(sink) = &self.sink {
            data_sinks.push(sink.configured());
        }

        let mut data_sources = Vec::new();
        match self.reader.clone() {
            Some(reader) if reader.is_remote() => data_sources.push(reader.configured()),
            Some(_) => {
                self.absorb_reader()?;
            }
            None => {}
        }
        if let Some(documents) = &self.documents {
            data_sources.extend(documents.iter().map(ConfiguredDataSource::from_document));
        }

        let project = client.create_project(project_name).await?;
        let project_id = project
            .id
            .ok_or(IngestError::MissingIdentifier { entity: "project" })?;

        let request = PipelineCreate {
            name: self.name.clone(),
            configured_transforms,
            data_sinks,
            data_sources,
        };
        let pipeline = client.upsert_pipeline(&project_id, &request).await?;
        let pipeline_id = pipeline
            .id
            .ok_or(IngestError::MissingIdentifier { entity: "pipeline" })?;

        if verbose {
            log::info!(
                "Pipeline available at: {}",
                self.config.pipeline_url(&pipeline_id)
            );
        }

        Ok(pipeline_id)
    }

    /// Registers the pipeline and triggers a remote execution, returning the
    /// execution's opaque identifier.
    pub async fn run_remote(
        &mut self,
        client: &dyn PlatformApi,
        project_name: &str,
    ) -> Result<ExecutionId, IngestError> {
        let pipeline_id = self.register(client, project_name, false).await?;

        let execution = client.create_execution(&pipeline_id).await?;
        let execution_id = execution.id.ok_or(IngestError::MissingIdentifier {
            entity: "execution",
        })?;

        log::info!(
            "Find your remote results at: {}",
            self.config.execution_url(&execution_id)
        );

        Ok(execution_id)
    }
}
