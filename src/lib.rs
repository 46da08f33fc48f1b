// src/lib.rs
//! docs2index library — splits documents into embedded nodes and registers
//! ingestion pipelines with a remote execution platform.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `IngestError`, `PlatformErrorCode`, `ValidationError`
//! - **Configuration** — `PlatformConfig`, `RunConfig`
//! - **Data model** — `Document`, `Node`, `Relationship`
//! - **Transforms** — `Transform`, `SentenceSplitter`, `Embedder`, the runner
//! - **Registration** — `PlatformApi`, `PlatformHttpClient`, wire snapshots
//! - **Sources and sinks** — `DocumentReader`, `DirectoryReader`, `VectorSink`

mod config;
mod configured;
mod error;
mod model;
mod pipeline;
mod platform;
mod reader;
mod sink;
pub mod transform;
mod types;

// --- Error Handling ---
pub use crate::error::{IngestError, PlatformErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    CommandLineInput, PlatformConfig, RunConfig, DEFAULT_BASE_URL, DEFAULT_CONSOLE_URL,
    DEFAULT_PIPELINE_NAME, DEFAULT_PROJECT_NAME,
};

// --- Data Model ---
pub use crate::model::{Document, Metadata, Node, RelationKind, Relationship};

// --- Domain Types ---
pub use crate::types::{
    ApiKey, DocumentId, ExecutionId, Id, NodeId, ProjectId, RemotePipelineId,
};

// --- Transforms ---
pub use crate::transform::{
    run_transforms, run_transforms_async, Embedder, EmbeddingClient, HttpEmbeddingClient,
    RunOptions, SentenceSplitter, Transform,
};

// --- Wire Snapshots ---
pub use crate::configured::{
    ConfiguredDataSink, ConfiguredDataSource, ConfiguredTransform, DirectoryReaderParams,
    DocumentSourceParams, RemoteEmbeddingParams, SentenceSplitterParams, SinkKind, SinkParams,
    SourceKind, SourceParams, TransformKind, TransformParams, VectorStoreParams,
};

// --- Registration ---
pub use crate::platform::{
    ExecutionResponse, PipelineCreate, PipelineResponse, PlatformApi, PlatformHttpClient,
    ProjectCreate, ProjectResponse,
};

// --- Sources and Sinks ---
pub use crate::reader::{DirectoryReader, DocumentReader};
pub use crate::sink::{MemoryVectorStore, VectorSink};

// --- Pipeline ---
pub use crate::pipeline::{IngestionPipeline, IngestionPipelineBuilder};
