// src/transform/embedder.rs
//! Embedding transform and its backend capability.
//!
//! `EmbeddingClient` is the seam between the pipeline and whatever service
//! computes vectors; `HttpEmbeddingClient` is the shipped backend, a thin
//! reqwest wrapper around a JSON embeddings endpoint. The transform batches
//! node text, submits it, and writes the vectors back onto the nodes.

use super::{RunOptions, Transform};
use crate::configured::{
    ConfiguredTransform, RemoteEmbeddingParams, TransformKind, TransformParams,
};
use crate::error::IngestError;
use crate::model::Node;
use crate::types::ApiKey;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;
pub const DEFAULT_EMBED_MODEL: &str = "default-embedding";
pub const DEFAULT_EMBED_ENDPOINT: &str = "http://localhost:8000/api/embeddings";

const EMBED_API_KEY_VAR: &str = "EMBEDDINGS_API_KEY";
const EMBED_ENDPOINT_VAR: &str = "EMBEDDINGS_ENDPOINT";
const EMBED_MODEL_VAR: &str = "EMBEDDINGS_MODEL";

/// The ability to turn a batch of texts into one vector per text.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Model identifier reported in wire snapshots.
    fn model(&self) -> &str;

    /// Endpoint identifier reported in wire snapshots.
    fn endpoint(&self) -> &str;

    /// Blocking batch embedding. Must return exactly one vector per input.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IngestError>;

    /// Asynchronous equivalent of [`embed`](EmbeddingClient::embed).
    async fn embed_async(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IngestError>;
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

/// Backend that POSTs `{model, input}` to a JSON embeddings endpoint.
///
/// The API key and HTTP clients are runtime state only; the wire snapshot of
/// an embedder carries just the model, endpoint, and batch size.
pub struct HttpEmbeddingClient {
    endpoint: String,
    model: String,
    api_key: ApiKey,
    client: reqwest::Client,
    // Built on first blocking use; reqwest's blocking client cannot be
    // constructed inside an async runtime.
    blocking: OnceCell<reqwest::blocking::Client>,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
            blocking: OnceCell::new(),
        }
    }

    /// Resolves the backend from `EMBEDDINGS_API_KEY`, with optional
    /// `EMBEDDINGS_ENDPOINT` and `EMBEDDINGS_MODEL` overrides.
    pub fn from_env() -> Result<Self, IngestError> {
        let raw_key = std::env::var(EMBED_API_KEY_VAR).map_err(|_| {
            IngestError::MissingConfiguration(format!(
                "{} environment variable not set",
                EMBED_API_KEY_VAR
            ))
        })?;
        let api_key = ApiKey::new(raw_key)?;
        let endpoint = std::env::var(EMBED_ENDPOINT_VAR)
            .unwrap_or_else(|_| DEFAULT_EMBED_ENDPOINT.to_string());
        let model =
            std::env::var(EMBED_MODEL_VAR).unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string());
        Ok(Self::new(endpoint, model, api_key))
    }

    fn parse_rows(
        response: EmbeddingsResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, IngestError> {
        let vectors: Vec<Vec<f32>> = response.data.into_iter().map(|row| row.embedding).collect();
        if vectors.len() != expected {
            return Err(IngestError::Embedding(format!(
                "embedding count mismatch: expected {}, got {}",
                expected,
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IngestError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let client = self
            .blocking
            .get_or_try_init(|| reqwest::blocking::Client::builder().build())?;
        let response = client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.as_str())
            .json(&EmbeddingsRequest {
                model: &self.model,
                input: texts,
            })
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IngestError::Embedding(format!(
                "embeddings endpoint returned {}: {}",
                status, body
            )));
        }
        Self::parse_rows(response.json()?, texts.len())
    }

    async fn embed_async(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IngestError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.as_str())
            .json(&EmbeddingsRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Embedding(format!(
                "embeddings endpoint returned {}: {}",
                status, body
            )));
        }
        Self::parse_rows(response.json().await?, texts.len())
    }
}

/// Transform that fills in `node.embedding` for every non-blank node.
///
/// Blank nodes pass through unembedded; the sink filter downstream drops
/// them from persistence.
pub struct Embedder {
    client: Arc<dyn EmbeddingClient>,
    batch_size: usize,
}

impl Embedder {
    pub fn new(client: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            client,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Indices of nodes that should be embedded, in batch order.
    fn embeddable(batch: &[Node]) -> Vec<usize> {
        batch
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.content.trim().is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    fn assign(batch: &mut [Node], indices: &[usize], vectors: Vec<Vec<f32>>) {
        for (index, vector) in indices.iter().zip(vectors) {
            batch[*index].embedding = Some(vector);
        }
    }
}

#[async_trait]
impl Transform for Embedder {
    fn kind(&self) -> TransformKind {
        TransformKind::RemoteEmbedding
    }

    fn configured(&self) -> ConfiguredTransform {
        ConfiguredTransform {
            kind: self.kind(),
            params: TransformParams::RemoteEmbedding(RemoteEmbeddingParams {
                model: self.client.model().to_string(),
                endpoint: self.client.endpoint().to_string(),
                batch_size: self.batch_size,
            }),
        }
    }

    fn apply(&self, mut batch: Vec<Node>, options: &RunOptions) -> Result<Vec<Node>, IngestError> {
        let indices = Self::embeddable(&batch);
        let mut done = 0usize;
        for chunk in indices.chunks(self.batch_size) {
            let texts: Vec<&str> = chunk.iter().map(|i| batch[*i].content.as_str()).collect();
            let vectors = self.client.embed(&texts)?;
            if vectors.len() != texts.len() {
                return Err(IngestError::Embedding(format!(
                    "embedding count mismatch: expected {}, got {}",
                    texts.len(),
                    vectors.len()
                )));
            }
            Self::assign(&mut batch, chunk, vectors);
            done += chunk.len();
            if options.show_progress {
                log::info!("embedded {}/{} nodes", done, indices.len());
            }
        }
        Ok(batch)
    }

    async fn apply_async(
        &self,
        mut batch: Vec<Node>,
        options: &RunOptions,
    ) -> Result<Vec<Node>, IngestError> {
        let indices = Self::embeddable(&batch);
        let mut done = 0usize;
        for chunk in indices.chunks(self.batch_size) {
            let texts: Vec<&str> = chunk.iter().map(|i| batch[*i].content.as_str()).collect();
            let vectors = self.client.embed_async(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(IngestError::Embedding(format!(
                    "embedding count mismatch: expected {}, got {}",
                    texts.len(),
                    vectors.len()
                )));
            }
            Self::assign(&mut batch, chunk, vectors);
            done += chunk.len();
            if options.show_progress {
                log::info!("embedded {}/{} nodes", done, indices.len());
            }
        }
        Ok(batch)
    }
}
