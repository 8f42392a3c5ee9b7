use tracing::{debug, info, warn};

use crate::api::{decode_task_response, TaskDecoder};
use crate::config::PollConfig;
use crate::error::BreakerError;
use crate::model::{PollAttempt, TaskStatus};
use crate::service::QualityGateService;

/// Waits for a compute-engine task to reach a terminal status.
///
/// Only a non-terminal status is retried. Transport and decode failures,
/// as well as `FAILED`/`CANCELED`, end the loop immediately.
pub struct TaskPoller<S> {
    service: S,
    config: PollConfig,
    decode: TaskDecoder,
}

impl<S: QualityGateService> TaskPoller<S> {
    pub fn new(service: S, config: PollConfig) -> Self {
        Self::with_decoder(service, config, decode_task_response)
    }

    pub fn with_decoder(service: S, config: PollConfig, decode: TaskDecoder) -> Self {
        Self {
            service,
            config,
            decode,
        }
    }

    /// Returns the analysis id produced by `task_id`.
    pub async fn poll(&self, task_id: &str) -> Result<String, BreakerError> {
        if task_id.is_empty() {
            return Err(BreakerError::InvalidTaskId);
        }

        let max = self.config.max_attempts;
        info!(
            task_id,
            max_attempts = max,
            interval_secs = self.config.interval.as_secs(),
            "waiting for report processing"
        );
        for attempt in 1..=max {
            let current = self.query(task_id, attempt).await?;

            match current.status {
                TaskStatus::Success => {
                    return match current.analysis_id {
                        Some(id) if !id.is_empty() => {
                            info!(task_id, attempt, analysis_id = %id, "report processed");
                            Ok(id)
                        }
                        _ => Err(BreakerError::MissingAnalysisId {
                            task_id: task_id.to_string(),
                        }),
                    };
                }
                TaskStatus::Failed | TaskStatus::Canceled => {
                    return Err(BreakerError::RemoteProcessing {
                        status: current.status,
                    });
                }
                TaskStatus::Other(ref status) => {
                    warn!(task_id, attempt, status = %status, "unknown task status, waiting");
                }
                TaskStatus::Pending | TaskStatus::InProgress => {
                    debug!(task_id, attempt, status = %current.status, "report not processed yet");
                }
            }

            if attempt < max {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        Err(BreakerError::Timeout)
    }

    async fn query(&self, task_id: &str, attempt: u32) -> Result<PollAttempt, BreakerError> {
        let body = self
            .service
            .fetch_task(task_id)
            .await
            .map_err(BreakerError::transport("task status"))?;
        let resp = (self.decode)(&body).map_err(BreakerError::transport("task status"))?;

        Ok(PollAttempt {
            attempt,
            status: resp.task.status,
            analysis_id: resp.task.analysis_id,
        })
    }
}
