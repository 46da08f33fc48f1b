use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Strong typing for IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePipelineMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionMarker;

/// Type aliases for specific ID types.
///
/// Node and document ids are minted locally; the remaining three are opaque
/// tokens handed back by the platform and never interpreted on this side.
pub type NodeId = Id<NodeMarker>;
pub type DocumentId = Id<DocumentMarker>;
pub type ProjectId = Id<ProjectMarker>;
pub type RemotePipelineId = Id<RemotePipelineMarker>;
pub type ExecutionId = Id<ExecutionMarker>;

impl<T> Id<T> {
    /// Create a new random v4 UUID ID
    pub fn new_v4() -> Self {
        let uuid = Uuid::new_v4();
        Self {
            value: uuid.as_simple().to_string(),
            _phantom: PhantomData,
        }
    }

    /// Wrap a raw string ID without interpreting it
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Re-tag the ID under a different marker, keeping the raw value
    pub fn retag<U>(&self) -> Id<U> {
        Id {
            value: self.value.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_raw(value))
    }
}
