#![forbid(unsafe_code)]

//! Waits for a SonarQube compute-engine task and breaks the build when the
//! resulting quality gate fails.

pub mod api;
pub mod breaker;
pub mod config;
pub mod error;
pub mod gate;
pub mod metadata;
pub mod model;
pub mod poller;
pub mod report;
pub mod service;

pub use breaker::{Outcome, QualityGateBreaker};
pub use config::{BreakerConfig, PollConfig};
pub use error::{BreakerError, MetadataError, TransportError};
pub use gate::{GateEvaluator, GateVerdict};
pub use metadata::TaskMetadata;
pub use poller::TaskPoller;
pub use report::{describe_condition, report_conditions};
pub use service::QualityGateService;
