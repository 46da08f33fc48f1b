// src/config.rs
use crate::error::IngestError;
use crate::types::{ApiKey, ExecutionId, RemotePipelineId, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_PIPELINE_NAME: &str = "pipeline";
pub const DEFAULT_PROJECT_NAME: &str = "project";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONSOLE_URL: &str = "http://localhost:8000/console";

const API_KEY_VAR: &str = "DOCS2INDEX_API_KEY";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Directory of documents to ingest
    pub input_dir: PathBuf,

    /// Pipeline name, the upsert key within the project
    #[arg(long, default_value = DEFAULT_PIPELINE_NAME)]
    pub name: String,

    /// Project to register the pipeline under
    #[arg(long, default_value = DEFAULT_PROJECT_NAME)]
    pub project: String,

    /// Register the pipeline remotely and trigger a platform execution
    /// instead of running transformations in-process
    #[arg(long, default_value_t = false)]
    pub remote: bool,

    /// Platform API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Console base URL used for human-readable links
    #[arg(long, default_value = DEFAULT_CONSOLE_URL)]
    pub console_url: String,

    /// Splitter chunk budget in characters
    #[arg(long, default_value_t = crate::transform::splitter::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Sentences repeated between adjacent chunks
    #[arg(long, default_value_t = crate::transform::splitter::DEFAULT_CHUNK_OVERLAP)]
    pub chunk_overlap: usize,

    /// Local vector store collection written on local runs
    #[arg(long, default_value = "default")]
    pub collection: String,

    /// Log per-step progress
    #[arg(long, default_value_t = false)]
    pub show_progress: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Platform connection settings.
///
/// An explicit value object with documented defaults — there is no
/// process-wide mutable state to override.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// API base, `http://localhost:8000` by default
    pub base_url: Url,
    /// Console base for human-readable links, `http://localhost:8000/console`
    /// by default
    pub console_url: Url,
    /// Bearer credential; unauthenticated when absent
    pub api_key: Option<ApiKey>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            console_url: Url::parse(DEFAULT_CONSOLE_URL).expect("default console URL is valid"),
            api_key: None,
        }
    }
}

impl PlatformConfig {
    pub fn new(base_url: &str, console_url: &str) -> Result<Self, IngestError> {
        let base_url = Url::parse(base_url).map_err(|e| ValidationError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let console_url = Url::parse(console_url).map_err(|e| ValidationError::InvalidBaseUrl {
            url: console_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            console_url,
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Console link for a registered pipeline.
    pub fn pipeline_url(&self, id: &RemotePipelineId) -> String {
        format!(
            "{}/pipelines?id={}",
            self.console_url.as_str().trim_end_matches('/'),
            id
        )
    }

    /// Console link for a triggered execution.
    pub fn execution_url(&self, id: &ExecutionId) -> String {
        format!(
            "{}/executions?id={}",
            self.console_url.as_str().trim_end_matches('/'),
            id
        )
    }
}

/// Resolved run configuration — validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub pipeline_name: String,
    pub project_name: String,
    pub remote: bool,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub collection: String,
    pub show_progress: bool,
    pub verbose: bool,
    pub platform: PlatformConfig,
}

impl RunConfig {
    /// Resolves a complete run configuration from CLI input and environment.
    ///
    /// `DOCS2INDEX_API_KEY` is required for remote runs and picked up
    /// opportunistically otherwise.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, IngestError> {
        let mut platform = PlatformConfig::new(&cli.base_url, &cli.console_url)?;

        match std::env::var(API_KEY_VAR) {
            Ok(raw) => platform = platform.with_api_key(ApiKey::new(raw)?),
            Err(_) if cli.remote => {
                return Err(IngestError::MissingConfiguration(format!(
                    "{} environment variable not set",
                    API_KEY_VAR
                )));
            }
            Err(_) => {}
        }

        if !cli.input_dir.is_dir() {
            return Err(IngestError::MissingConfiguration(format!(
                "input directory {} does not exist",
                cli.input_dir.display()
            )));
        }

        Ok(Self {
            input_dir: cli.input_dir,
            pipeline_name: cli.name,
            project_name: cli.project,
            remote: cli.remote,
            chunk_size: cli.chunk_size,
            chunk_overlap: cli.chunk_overlap,
            collection: cli.collection,
            show_progress: cli.show_progress,
            verbose: cli.verbose,
            platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_urls() {
        let config = PlatformConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = PlatformConfig::new("not a url", DEFAULT_CONSOLE_URL).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Validation(ValidationError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn console_links_reference_the_identifier() {
        let config = PlatformConfig::default();
        let pipeline_id = RemotePipelineId::from_raw("pl_42");
        assert_eq!(
            config.pipeline_url(&pipeline_id),
            "http://localhost:8000/console/pipelines?id=pl_42"
        );
        let execution_id = ExecutionId::from_raw("ex_9");
        assert_eq!(
            config.execution_url(&execution_id),
            "http://localhost:8000/console/executions?id=ex_9"
        );
    }
}
