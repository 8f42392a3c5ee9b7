use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a compute-engine task as reported by the server.
///
/// Statuses this crate does not know about are kept verbatim in `Other` and
/// treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Canceled,
    Other(String),
}

impl TaskStatus {
    /// True once the server will not change the status any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Canceled)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "IN_PROGRESS" => Self::InProgress,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            "CANCELED" => Self::Canceled,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality gate status, used both for the overall verdict and per condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityStatus {
    Ok,
    Warn,
    Error,
    /// No quality gate is associated with the project.
    None,
}

impl QualityStatus {
    /// Everything except `ERROR` lets the build continue.
    pub fn is_acceptable(self) -> bool {
        self != Self::Error
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a quality gate condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Comparator {
    Gt,
    Lt,
    Eq,
    Ne,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

/// One metric-level rule evaluation within a quality gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub status: QualityStatus,
    pub metric_key: String,
    pub comparator: Comparator,
    #[serde(default)]
    pub actual_value: Option<String>,
    #[serde(default)]
    pub warning_threshold: Option<String>,
    #[serde(default)]
    pub error_threshold: Option<String>,
}

/// Aggregate quality gate result for one analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
    pub status: QualityStatus,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Compute-engine task as returned by the task-status query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub status: TaskStatus,
    /// Populated only once the task reached `SUCCESS`.
    #[serde(default)]
    pub analysis_id: Option<String>,
}

/// Transient record of a single status query inside the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollAttempt {
    /// 1-based.
    pub attempt: u32,
    pub status: TaskStatus,
    pub analysis_id: Option<String>,
}
