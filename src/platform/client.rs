// src/platform/client.rs
//! HTTP implementation of the platform API.
//!
//! A thin wrapper around reqwest: authentication, request dispatch, and the
//! mapping from error bodies into the typed error vocabulary. No business
//! logic lives here.

use super::payloads::{
    ExecutionResponse, PipelineCreate, PipelineResponse, ProjectCreate, ProjectResponse,
};
use super::PlatformApi;
use crate::config::PlatformConfig;
use crate::error::{IngestError, PlatformErrorCode};
use crate::types::{ProjectId, RemotePipelineId};
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// Error body shape the platform uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct PlatformErrorBody {
    code: String,
    message: String,
}

/// A thin wrapper around reqwest Client for platform API requests.
#[derive(Clone)]
pub struct PlatformHttpClient {
    base_url: Url,
    client: Client,
}

impl PlatformHttpClient {
    /// Creates a new HTTP client for the configured platform.
    pub fn new(config: &PlatformConfig) -> Result<Self, IngestError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(config)?)
            .build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    fn create_headers(config: &PlatformConfig) -> Result<header::HeaderMap, IngestError> {
        let mut headers = header::HeaderMap::new();

        if let Some(api_key) = &config.api_key {
            let auth_header = format!("Bearer {}", api_key.as_str());
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&auth_header).map_err(|e| {
                    IngestError::MissingConfiguration(format!("Invalid API key format: {}", e))
                })?,
            );
        }

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, IngestError> {
        let url = self.endpoint(path);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, IngestError> {
        let url = self.endpoint(path);
        log::debug!("PUT {}", url);
        let response = self.client.put(url).json(body).send().await?;
        Self::decode(response).await
    }

    /// Turns a response into a typed payload, mapping error bodies into the
    /// platform error vocabulary.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, IngestError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<PlatformErrorBody>(&text) {
                Ok(body) => IngestError::PlatformService {
                    code: PlatformErrorCode::from_api_response(&body.code),
                    message: body.message,
                    status,
                },
                Err(_) => IngestError::PlatformService {
                    code: PlatformErrorCode::from_http_status(status.as_u16()),
                    message: text,
                    status,
                },
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PlatformApi for PlatformHttpClient {
    async fn create_project(&self, name: &str) -> Result<ProjectResponse, IngestError> {
        self.post(
            "api/projects",
            &ProjectCreate {
                name: name.to_string(),
            },
        )
        .await
    }

    async fn upsert_pipeline(
        &self,
        project_id: &ProjectId,
        request: &PipelineCreate,
    ) -> Result<PipelineResponse, IngestError> {
        self.put(&format!("api/projects/{}/pipelines", project_id), request)
            .await
    }

    async fn create_execution(
        &self,
        pipeline_id: &RemotePipelineId,
    ) -> Result<ExecutionResponse, IngestError> {
        self.post(
            &format!("api/pipelines/{}/executions", pipeline_id),
            &serde_json::json!({}),
        )
        .await
    }
}
