use tracing::info;

use crate::config::BreakerConfig;
use crate::error::BreakerError;
use crate::gate::{GateEvaluator, GateVerdict};
use crate::metadata::TaskMetadata;
use crate::poller::TaskPoller;
use crate::service::QualityGateService;

/// Result of a check that did not break the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `skip` was set; nothing was read or queried.
    Skipped,
    Passed(GateVerdict),
}

/// Entry point: waits for the scanner's task, then enforces the quality gate.
pub struct QualityGateBreaker {
    config: BreakerConfig,
}

impl QualityGateBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    pub fn should_execute(&self) -> bool {
        !self.config.skip
    }

    pub fn load_metadata(&self) -> Result<TaskMetadata, BreakerError> {
        let path = self.config.metadata_path();
        TaskMetadata::load(&path).map_err(|source| BreakerError::MetadataLoad { path, source })
    }

    /// Runs the whole check.
    ///
    /// `connect` builds the service client once the report-task file is known,
    /// so a skipped run never constructs one.
    pub async fn execute<S, F>(&self, connect: F) -> Result<Outcome, BreakerError>
    where
        S: QualityGateService,
        F: FnOnce(&TaskMetadata) -> Result<S, BreakerError>,
    {
        if !self.should_execute() {
            info!("quality gate check skipped");
            return Ok(Outcome::Skipped);
        }

        let metadata = self.load_metadata()?;
        info!(
            task_id = metadata.task_id(),
            project = metadata.project_key().unwrap_or("unknown"),
            "loaded report task"
        );
        let service = connect(&metadata)?;
        let verdict = self.check(&service, metadata.task_id()).await?;

        if let Some(url) = metadata.dashboard_url() {
            info!(dashboard = url, "analysis details");
        }
        Ok(Outcome::Passed(verdict))
    }

    /// Polls `task_id` to completion and evaluates the resulting analysis.
    pub async fn check<S: QualityGateService>(
        &self,
        service: &S,
        task_id: &str,
    ) -> Result<GateVerdict, BreakerError> {
        let analysis_id = TaskPoller::new(service, self.config.poll())
            .poll(task_id)
            .await?;
        GateEvaluator::new(service).evaluate(&analysis_id).await
    }
}
