// src/platform/mod.rs
//! Remote registration API — project, pipeline, and execution management.
//!
//! Business logic depends on the [`PlatformApi`] trait, never on HTTP
//! details. Responses carry optional identifiers: the platform contract does
//! not guarantee them, so callers validate presence where it matters.

pub mod client;
mod payloads;

pub use client::PlatformHttpClient;
pub use payloads::{
    ExecutionResponse, PipelineCreate, PipelineResponse, ProjectCreate, ProjectResponse,
};

use crate::error::IngestError;
use crate::types::{ProjectId, RemotePipelineId};
use async_trait::async_trait;

/// The ability to register and trigger pipelines on the platform.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Creates the named project, or returns it if it already exists.
    async fn create_project(&self, name: &str) -> Result<ProjectResponse, IngestError>;

    /// Creates or updates a pipeline, keyed by pipeline name within the
    /// project.
    async fn upsert_pipeline(
        &self,
        project_id: &ProjectId,
        request: &PipelineCreate,
    ) -> Result<PipelineResponse, IngestError>;

    /// Starts a remote execution of a registered pipeline.
    async fn create_execution(
        &self,
        pipeline_id: &RemotePipelineId,
    ) -> Result<ExecutionResponse, IngestError>;
}
