use std::path::PathBuf;

use thiserror::Error;

use crate::model::TaskStatus;

/// Every way a quality gate check can abort the build.
#[derive(Debug, Error)]
pub enum BreakerError {
    #[error("Unable to load properties from file {}", .path.display())]
    MetadataLoad {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
    #[error("Unable to query {operation}")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("Report processing did not complete successfully: {status}")]
    RemoteProcessing { status: TaskStatus },
    #[error("Report processing is taking longer than the configured wait limit.")]
    Timeout,
    #[error("Project does not pass the quality gate.")]
    GateFailed,
    #[error("Task {task_id} completed without an analysis id")]
    MissingAnalysisId { task_id: String },
    #[error("Task id must not be empty")]
    InvalidTaskId,
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BreakerError {
    pub fn config<E: std::fmt::Display>(e: E) -> Self {
        Self::Config(e.to_string())
    }

    pub(crate) fn transport(operation: &'static str) -> impl FnOnce(TransportError) -> Self {
        move |source| Self::Transport { operation, source }
    }
}

/// Failure talking to the quality gate service.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    pub fn request<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request(Box::new(e))
    }
}

/// Failure reading the report-task metadata file.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),
}
