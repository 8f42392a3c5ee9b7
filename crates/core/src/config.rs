use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BreakerError;
use crate::metadata::TaskMetadata;

pub const DEFAULT_QUERY_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_QUERY_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_WORK_DIR: &str = ".scannerwork";
pub const DEFAULT_CONFIG_FILE: &str = "buildbreaker.toml";

/// Settings recognised by the quality gate check.
///
/// Loaded from `buildbreaker.toml`; every field may be omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakerConfig {
    /// Disables the whole check.
    pub skip: bool,
    /// Upper bound on task-status queries. `0` fails without querying.
    pub query_max_attempts: u32,
    /// Fixed wait between two task-status queries.
    pub query_interval_seconds: u64,
    /// Explicit location of the report-task file.
    pub metadata_file_path: Option<PathBuf>,
    /// Scanner working directory holding `report-task.txt`.
    pub work_dir: PathBuf,
    /// Server base url. Falls back to `serverUrl` from the report-task file.
    pub server_url: Option<String>,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            skip: false,
            query_max_attempts: DEFAULT_QUERY_MAX_ATTEMPTS,
            query_interval_seconds: DEFAULT_QUERY_INTERVAL_SECONDS,
            metadata_file_path: None,
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            server_url: None,
        }
    }
}

impl BreakerConfig {
    pub fn load_from(path: &Path) -> Result<Self, BreakerError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| BreakerError::config(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&s)
            .map_err(|e| BreakerError::config(format!("parse {}: {e}", path.display())))
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, BreakerError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn poll(&self) -> PollConfig {
        PollConfig {
            max_attempts: self.query_max_attempts,
            interval: Duration::from_secs(self.query_interval_seconds),
        }
    }

    /// Where the report-task file is read from.
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata_file_path
            .clone()
            .unwrap_or_else(|| TaskMetadata::default_path(&self.work_dir))
    }

    /// Configured server url, or the one the scanner recorded.
    pub fn resolve_server_url<'a>(
        &'a self,
        metadata: &'a TaskMetadata,
    ) -> Result<&'a str, BreakerError> {
        let non_blank = |url: &&str| !url.trim().is_empty();
        self.server_url
            .as_deref()
            .filter(non_blank)
            .or_else(|| metadata.server_url().filter(non_blank))
            .ok_or_else(|| BreakerError::config("no server url configured or found in report-task file"))
    }
}

/// Bounds of the task-status polling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        BreakerConfig::default().poll()
    }
}
