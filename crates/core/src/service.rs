use crate::error::TransportError;

/// Read-only access to the quality gate server.
///
/// Implementations return the raw response body; decoding is left to the
/// caller so the poller and evaluator can plug in their own decoders.
#[allow(async_fn_in_trait)]
pub trait QualityGateService {
    /// Fetches the compute-engine task with the given id.
    async fn fetch_task(&self, task_id: &str) -> Result<Vec<u8>, TransportError>;

    /// Fetches the quality gate status computed for an analysis.
    async fn fetch_project_status(&self, analysis_id: &str) -> Result<Vec<u8>, TransportError>;
}

impl<S: QualityGateService> QualityGateService for &S {
    async fn fetch_task(&self, task_id: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch_task(task_id).await
    }

    async fn fetch_project_status(&self, analysis_id: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch_project_status(analysis_id).await
    }
}
