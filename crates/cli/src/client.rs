use std::time::Duration;

use buildbreaker_core::{BreakerError, QualityGateService, TransportError};
use reqwest::Url;

const TASK_PATH: &str = "api/ce/task";
const PROJECT_STATUS_PATH: &str = "api/qualitygates/project_status";

/// `QualityGateService` over the SonarQube web API.
#[derive(Debug, Clone)]
pub struct SonarClient {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl SonarClient {
    pub fn new(
        server_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BreakerError> {
        let mut base = Url::parse(server_url.trim())
            .map_err(|e| BreakerError::config(format!("server url '{server_url}': {e}")))?;
        // Url::join drops the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("buildbreaker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BreakerError::config)?;

        Ok(Self {
            client,
            base,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str, key: &str, value: &str) -> Result<Url, TransportError> {
        let mut url = self.base.join(path).map_err(TransportError::request)?;
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, TransportError> {
        tracing::debug!(%url, "GET");
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.basic_auth(token, None::<&str>);
        }

        let resp = req.send().await.map_err(TransportError::request)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(TransportError::request)?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }
        Ok(body.to_vec())
    }
}

impl QualityGateService for SonarClient {
    async fn fetch_task(&self, task_id: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint(TASK_PATH, "id", task_id)?;
        self.get(url).await
    }

    async fn fetch_project_status(&self, analysis_id: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint(PROJECT_STATUS_PATH, "analysisId", analysis_id)?;
        self.get(url).await
    }
}
