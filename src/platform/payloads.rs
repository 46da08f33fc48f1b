use crate::configured::{ConfiguredDataSink, ConfiguredDataSource, ConfiguredTransform};
use crate::types::{ExecutionId, ProjectId, RemotePipelineId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for project creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
}

/// Full pipeline definition submitted on upsert.
///
/// Source order is part of the contract: consumers rely on the source list
/// matching document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineCreate {
    pub name: String,
    pub configured_transforms: Vec<ConfiguredTransform>,
    pub data_sinks: Vec<ConfiguredDataSink>,
    pub data_sources: Vec<ConfiguredDataSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Option<ProjectId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub id: Option<RemotePipelineId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub id: Option<ExecutionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<RemotePipelineId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn responses_tolerate_missing_identifiers() {
        let project: ProjectResponse =
            serde_json::from_value(json!({ "id": null, "name": "demo" })).unwrap();
        assert!(project.id.is_none());

        let execution: ExecutionResponse =
            serde_json::from_value(json!({ "id": "ex_1" })).unwrap();
        assert_eq!(execution.id.unwrap().as_str(), "ex_1");
        assert!(execution.created_at.is_none());
    }

    #[test]
    fn pipeline_create_serializes_all_sections() {
        let request = PipelineCreate {
            name: "nightly".into(),
            configured_transforms: vec![],
            data_sinks: vec![],
            data_sources: vec![],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["name"], "nightly");
        assert!(value["configured_transforms"].as_array().unwrap().is_empty());
        assert!(value["data_sinks"].as_array().unwrap().is_empty());
        assert!(value["data_sources"].as_array().unwrap().is_empty());
    }
}
