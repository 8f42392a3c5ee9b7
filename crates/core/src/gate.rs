use tracing::{info, warn};

use crate::api::{decode_project_status_response, ProjectStatusDecoder};
use crate::error::BreakerError;
use crate::model::QualityStatus;
use crate::report::report_conditions;
use crate::service::QualityGateService;

/// Outcome of an acceptable quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVerdict {
    pub status: QualityStatus,
    /// Conditions individually in `ERROR`.
    pub error_count: usize,
}

/// Reads the quality gate verdict of a finished analysis. Never retries.
pub struct GateEvaluator<S> {
    service: S,
    decode: ProjectStatusDecoder,
}

impl<S: QualityGateService> GateEvaluator<S> {
    pub fn new(service: S) -> Self {
        Self::with_decoder(service, decode_project_status_response)
    }

    pub fn with_decoder(service: S, decode: ProjectStatusDecoder) -> Self {
        Self { service, decode }
    }

    pub async fn evaluate(&self, analysis_id: &str) -> Result<GateVerdict, BreakerError> {
        let body = self
            .service
            .fetch_project_status(analysis_id)
            .await
            .map_err(BreakerError::transport("quality gate status"))?;
        let project = (self.decode)(&body)
            .map_err(BreakerError::transport("quality gate status"))?
            .project_status;

        let error_count = report_conditions(&project.conditions);
        let verdict = GateVerdict {
            status: project.status,
            error_count,
        };

        match project.status {
            QualityStatus::Error => {
                warn!(analysis_id, error_count, "quality gate failed");
                Err(BreakerError::GateFailed)
            }
            QualityStatus::Warn => {
                warn!(analysis_id, "quality gate passed with warnings");
                Ok(verdict)
            }
            QualityStatus::None => {
                info!(analysis_id, "no quality gate associated with the project");
                Ok(verdict)
            }
            QualityStatus::Ok => {
                info!(analysis_id, "quality gate passed");
                Ok(verdict)
            }
        }
    }
}
