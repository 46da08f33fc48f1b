// tests/common/mod.rs
//! Shared stubs for integration tests: deterministic transforms, readers,
//! and a recording platform client.
#![allow(dead_code)]

use async_trait::async_trait;
use docs2index::{
    ConfiguredDataSource, ConfiguredTransform, Document, EmbeddingClient, ExecutionResponse,
    IngestError, Node, PipelineCreate, PipelineResponse, PlatformApi, ProjectId, ProjectResponse,
    RemotePipelineId, RunOptions, SourceKind, SourceParams, Transform, TransformKind,
    TransformParams,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn doc(text: &str) -> Document {
    Document::new(text)
}

/// Splits every node's content in half, doubling batch cardinality.
pub struct Doubler;

impl Transform for Doubler {
    fn kind(&self) -> TransformKind {
        TransformKind::Unknown("doubler".into())
    }

    fn configured(&self) -> ConfiguredTransform {
        ConfiguredTransform {
            kind: self.kind(),
            params: TransformParams::Unknown(Default::default()),
        }
    }

    fn apply(&self, batch: Vec<Node>, _options: &RunOptions) -> Result<Vec<Node>, IngestError> {
        let mut out = Vec::with_capacity(batch.len() * 2);
        for node in batch {
            let mid = node.content.len() / 2;
            let (left, right) = node.content.split_at(mid);
            out.push(Node::new(left));
            out.push(Node::new(right));
        }
        Ok(out)
    }
}

/// Appends a marker to every node's content.
pub struct Tagger(pub &'static str);

impl Transform for Tagger {
    fn kind(&self) -> TransformKind {
        TransformKind::Unknown("tagger".into())
    }

    fn configured(&self) -> ConfiguredTransform {
        ConfiguredTransform {
            kind: self.kind(),
            params: TransformParams::Unknown(Default::default()),
        }
    }

    fn apply(&self, batch: Vec<Node>, _options: &RunOptions) -> Result<Vec<Node>, IngestError> {
        Ok(batch
            .into_iter()
            .map(|mut node| {
                node.content.push_str(self.0);
                node
            })
            .collect())
    }
}

/// Fails on every invocation.
pub struct FailingStep;

impl Transform for FailingStep {
    fn kind(&self) -> TransformKind {
        TransformKind::Unknown("failing".into())
    }

    fn configured(&self) -> ConfiguredTransform {
        ConfiguredTransform {
            kind: self.kind(),
            params: TransformParams::Unknown(Default::default()),
        }
    }

    fn apply(&self, _batch: Vec<Node>, _options: &RunOptions) -> Result<Vec<Node>, IngestError> {
        Err(IngestError::Transform("boom".into()))
    }
}

/// Deterministic embedding backend: the vector encodes the text length.
pub struct StubEmbeddingClient;

#[async_trait]
impl EmbeddingClient for StubEmbeddingClient {
    fn model(&self) -> &str {
        "stub"
    }

    fn endpoint(&self) -> &str {
        "stub://embeddings"
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IngestError> {
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
    }

    async fn embed_async(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IngestError> {
        self.embed(texts)
    }
}

/// Reader that yields a fixed set of texts on every read and counts reads.
pub struct StubReader {
    texts: Vec<String>,
    remote: bool,
    reads: AtomicUsize,
}

impl StubReader {
    pub fn local(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            remote: false,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn remote(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            remote: true,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl docs2index::DocumentReader for StubReader {
    fn is_remote(&self) -> bool {
        self.remote
    }

    fn read(&self) -> Result<Vec<Document>, IngestError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.texts.iter().map(|t| Document::new(t.as_str())).collect())
    }

    fn configured(&self) -> ConfiguredDataSource {
        ConfiguredDataSource {
            name: "stub-reader".into(),
            kind: SourceKind::Reader,
            params: SourceParams::Unknown(Default::default()),
        }
    }
}

/// What the recording platform should do on each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformBehavior {
    Normal,
    ProjectWithoutId,
    PipelineWithoutId,
    ExecutionWithoutId,
}

/// In-memory platform that records every call and upserts by
/// (project, pipeline name), like the real service.
pub struct RecordingPlatform {
    pub behavior: PlatformBehavior,
    pub projects: Mutex<Vec<String>>,
    /// One entry per distinct (project id, pipeline name); updated in place.
    pub pipelines: Mutex<Vec<(String, PipelineCreate)>>,
    pub upsert_calls: AtomicUsize,
    pub executions: Mutex<Vec<String>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::with_behavior(PlatformBehavior::Normal)
    }

    pub fn with_behavior(behavior: PlatformBehavior) -> Self {
        Self {
            behavior,
            projects: Mutex::new(Vec::new()),
            pipelines: Mutex::new(Vec::new()),
            upsert_calls: AtomicUsize::new(0),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// The most recent upsert payload for the given pipeline name.
    pub fn pipeline_record(&self, name: &str) -> Option<PipelineCreate> {
        self.pipelines
            .lock()
            .iter()
            .find(|(key, _)| key.ends_with(&format!("/{}", name)))
            .map(|(_, request)| request.clone())
    }
}

#[async_trait]
impl PlatformApi for RecordingPlatform {
    async fn create_project(&self, name: &str) -> Result<ProjectResponse, IngestError> {
        self.projects.lock().push(name.to_string());
        let id = match self.behavior {
            PlatformBehavior::ProjectWithoutId => None,
            _ => Some(ProjectId::from_raw(format!("proj-{}", name))),
        };
        Ok(ProjectResponse {
            id,
            name: name.to_string(),
        })
    }

    async fn upsert_pipeline(
        &self,
        project_id: &ProjectId,
        request: &PipelineCreate,
    ) -> Result<PipelineResponse, IngestError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let key = format!("{}/{}", project_id, request.name);
        let mut pipelines = self.pipelines.lock();
        match pipelines.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = request.clone(),
            None => pipelines.push((key.clone(), request.clone())),
        }
        let id = match self.behavior {
            PlatformBehavior::PipelineWithoutId => None,
            _ => Some(RemotePipelineId::from_raw(format!("pl-{}", request.name))),
        };
        Ok(PipelineResponse {
            id,
            name: request.name.clone(),
        })
    }

    async fn create_execution(
        &self,
        pipeline_id: &RemotePipelineId,
    ) -> Result<ExecutionResponse, IngestError> {
        self.executions.lock().push(pipeline_id.to_string());
        let id = match self.behavior {
            PlatformBehavior::ExecutionWithoutId => None,
            _ => Some(docs2index::ExecutionId::from_raw(format!(
                "ex-{}",
                pipeline_id
            ))),
        };
        Ok(ExecutionResponse {
            id,
            pipeline_id: Some(pipeline_id.clone()),
            created_at: None,
        })
    }
}
