use std::path::{Path, PathBuf};
use std::time::Duration;

use buildbreaker_core::config::DEFAULT_CONFIG_FILE;
use buildbreaker_core::{BreakerConfig, BreakerError};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "buildbreaker",
    version,
    about = "Fails the build when the SonarQube quality gate does not pass"
)]
pub struct Args {
    /// TOML configuration file. Defaults to ./buildbreaker.toml when present.
    #[arg(long, env = "BUILDBREAKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the quality gate check entirely.
    #[arg(long, env = "BUILDBREAKER_SKIP")]
    pub skip: bool,

    /// Maximum number of task status queries (0 fails immediately).
    #[arg(long, env = "BUILDBREAKER_QUERY_MAX_ATTEMPTS")]
    pub query_max_attempts: Option<u32>,

    /// Seconds to wait between two task status queries.
    #[arg(long, env = "BUILDBREAKER_QUERY_INTERVAL_SECONDS")]
    pub query_interval_seconds: Option<u64>,

    /// Explicit path of the scanner's report-task file.
    #[arg(long, env = "BUILDBREAKER_METADATA_FILE_PATH")]
    pub metadata_file_path: Option<PathBuf>,

    /// Scanner working directory containing report-task.txt.
    #[arg(long, env = "BUILDBREAKER_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Server base url, e.g. https://sonar.example.com. Defaults to the
    /// serverUrl recorded by the scanner.
    #[arg(long, env = "SONAR_HOST_URL")]
    pub server_url: Option<String>,

    /// Authentication token.
    #[arg(long, env = "SONAR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout_seconds: u64,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl Args {
    /// Config file values overlaid with whatever was given on the command line.
    pub fn resolve_config(&self) -> Result<BreakerConfig, BreakerError> {
        let mut cfg = match &self.config {
            Some(path) => BreakerConfig::load_from(path)?,
            None => BreakerConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
        };

        cfg.skip |= self.skip;
        if let Some(n) = self.query_max_attempts {
            cfg.query_max_attempts = n;
        }
        if let Some(secs) = self.query_interval_seconds {
            cfg.query_interval_seconds = secs;
        }
        if let Some(path) = &self.metadata_file_path {
            cfg.metadata_file_path = Some(path.clone());
        }
        if let Some(dir) = &self.work_dir {
            cfg.work_dir = dir.clone();
        }
        if let Some(url) = &self.server_url {
            cfg.server_url = Some(url.clone());
        }
        Ok(cfg)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}
