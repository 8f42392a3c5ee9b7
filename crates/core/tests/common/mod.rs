#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use buildbreaker_core::api::{ProjectStatusResponse, TaskResponse};
use buildbreaker_core::model::{
    Comparator, Condition, ProjectStatus, QualityStatus, Task, TaskStatus,
};
use buildbreaker_core::{QualityGateService, TransportError};

pub const TASK_ID: &str = "Abc123";
pub const ANALYSIS_ID: &str = "Def456";

/// Replays canned responses in order and counts every query.
#[derive(Default)]
pub struct ScriptedService {
    tasks: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    project_status: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    task_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_task(self, status: TaskStatus, analysis_id: Option<&str>) -> Self {
        self.tasks
            .lock()
            .unwrap()
            .push_back(Ok(task_body(status, analysis_id)));
        self
    }

    pub fn then_task_error(self, err: TransportError) -> Self {
        self.tasks.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn then_raw_task(self, body: &[u8]) -> Self {
        self.tasks.lock().unwrap().push_back(Ok(body.to_vec()));
        self
    }

    pub fn then_gate(self, status: QualityStatus, conditions: Vec<Condition>) -> Self {
        self.project_status
            .lock()
            .unwrap()
            .push_back(Ok(project_status_body(status, conditions)));
        self
    }

    pub fn then_gate_error(self, err: TransportError) -> Self {
        self.project_status.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn task_calls(&self) -> usize {
        self.task_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

impl QualityGateService for ScriptedService {
    async fn fetch_task(&self, task_id: &str) -> Result<Vec<u8>, TransportError> {
        assert_eq!(task_id, TASK_ID);
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        self.tasks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn fetch_project_status(&self, analysis_id: &str) -> Result<Vec<u8>, TransportError> {
        assert_eq!(analysis_id, ANALYSIS_ID);
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.project_status
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }
}

fn exhausted() -> TransportError {
    TransportError::Status {
        status: 500,
        body: "no scripted response left".into(),
    }
}

pub fn task_body(status: TaskStatus, analysis_id: Option<&str>) -> Vec<u8> {
    serde_json::to_vec(&TaskResponse {
        task: Task {
            id: TASK_ID.into(),
            status,
            analysis_id: analysis_id.map(Into::into),
        },
    })
    .unwrap()
}

pub fn project_status_body(status: QualityStatus, conditions: Vec<Condition>) -> Vec<u8> {
    serde_json::to_vec(&ProjectStatusResponse {
        project_status: ProjectStatus { status, conditions },
    })
    .unwrap()
}

pub fn condition(
    status: QualityStatus,
    metric: &str,
    actual: &str,
    comparator: Comparator,
    warning: Option<&str>,
    error: Option<&str>,
) -> Condition {
    Condition {
        status,
        metric_key: metric.into(),
        comparator,
        actual_value: Some(actual.into()),
        warning_threshold: warning.map(Into::into),
        error_threshold: error.map(Into::into),
    }
}

pub fn io_error() -> TransportError {
    TransportError::request(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}
