// src/error.rs
//! Library error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system. The core
//! performs no internal retries: every failure surfaces to the immediate
//! caller, and already-applied transforms or merged documents stay applied.

use std::fmt;
use thiserror::Error;

/// Platform API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the codes the platform reports are encoded in the type system,
/// enabling pattern-based handling without stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformErrorCode {
    /// API rate limit exceeded — back off and retry
    RateLimited,
    /// The named project does not exist or is inaccessible
    ProjectNotFound,
    /// The pipeline id is unknown to the platform
    PipelineNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// Request parameters failed the platform's validation
    ValidationFailed,
    /// Platform internal server error
    InternalError,
    /// Platform is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl PlatformErrorCode {
    /// Parse a platform error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "project_not_found" => Self::ProjectNotFound,
            "pipeline_not_found" => Self::PipelineNotFound,
            "unauthorized" => Self::Unauthorized,
            "validation_error" => Self::ValidationFailed,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError
        )
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound | Self::PipelineNotFound)
    }
}

impl fmt::Display for PlatformErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ProjectNotFound => write!(f, "project_not_found"),
            Self::PipelineNotFound => write!(f, "pipeline_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main library error type.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Transform failed: {0}")]
    Transform(String),

    #[error("Embedding backend error: {0}")]
    Embedding(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Platform returned an error ({code}): {message}")]
    PlatformService {
        code: PlatformErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Platform response missing {entity} identifier")]
    MissingIdentifier { entity: &'static str },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = IngestError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_round_trips_through_display() {
        let code = PlatformErrorCode::from_api_response("rate_limited");
        assert_eq!(code, PlatformErrorCode::RateLimited);
        assert_eq!(code.to_string(), "rate_limited");
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let code = PlatformErrorCode::from_api_response("quota_exceeded");
        assert_eq!(code, PlatformErrorCode::Unknown("quota_exceeded".into()));
        assert_eq!(code.to_string(), "quota_exceeded");
    }

    #[test]
    fn retryable_classification() {
        assert!(PlatformErrorCode::RateLimited.is_retryable());
        assert!(PlatformErrorCode::ServiceUnavailable.is_retryable());
        assert!(!PlatformErrorCode::ValidationFailed.is_retryable());
        assert!(!PlatformErrorCode::HttpStatus(404).is_retryable());
    }

    #[test]
    fn not_found_classification() {
        assert!(PlatformErrorCode::ProjectNotFound.is_not_found());
        assert!(!PlatformErrorCode::Unauthorized.is_not_found());
    }
}
