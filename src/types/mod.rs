//! Domain primitive types — strongly-typed ids and credentials.

mod ids;

pub use ids::{
    DocumentId, ExecutionId, Id, NodeId, ProjectId, RemotePipelineId,
};

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Validation failures for domain primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid base URL: {url} - {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Platform API key. Never serialized and never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validates and wraps a raw key string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "key is empty".to_string(),
            });
        }
        if raw.len() < 12 {
            return Err(ValidationError::InvalidApiKey {
                reason: "key is too short".to_string(),
            });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Redacts the key down to a recognizable prefix.
impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

// Keys must never leave the process through a serialized payload.
impl Serialize for ApiKey {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(serde::ser::Error::custom("API keys are not serializable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_api_key() {
        let key = ApiKey::new("pk_abcdefghijklmnop");
        assert!(key.is_ok());
        assert_eq!(key.unwrap().as_str(), "pk_abcdefghijklmnop");
    }

    #[test]
    fn invalid_api_key_empty() {
        assert!(matches!(
            ApiKey::new(""),
            Err(ValidationError::InvalidApiKey { reason }) if reason.contains("empty")
        ));
    }

    #[test]
    fn invalid_api_key_too_short() {
        assert!(matches!(
            ApiKey::new("pk_short"),
            Err(ValidationError::InvalidApiKey { reason }) if reason.contains("too short")
        ));
    }

    #[test]
    fn api_key_display_redacts_value() {
        let key = ApiKey::new("pk_supersecretkey123456").unwrap();
        let display = format!("{}", key);
        assert_eq!(display, "pk_sup...");
        assert!(!display.contains("supersecretkey"));
    }
}
