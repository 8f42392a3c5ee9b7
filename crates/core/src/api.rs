use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::model::{ProjectStatus, Task};

/// Body of `GET /api/ce/task`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
}

/// Body of `GET /api/qualitygates/project_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusResponse {
    pub project_status: ProjectStatus,
}

/// Turns a raw task-status body into a [`TaskResponse`].
pub type TaskDecoder = fn(&[u8]) -> Result<TaskResponse, TransportError>;

/// Turns a raw project-status body into a [`ProjectStatusResponse`].
pub type ProjectStatusDecoder = fn(&[u8]) -> Result<ProjectStatusResponse, TransportError>;

pub fn decode_task_response(body: &[u8]) -> Result<TaskResponse, TransportError> {
    Ok(serde_json::from_slice(body)?)
}

pub fn decode_project_status_response(
    body: &[u8],
) -> Result<ProjectStatusResponse, TransportError> {
    Ok(serde_json::from_slice(body)?)
}
