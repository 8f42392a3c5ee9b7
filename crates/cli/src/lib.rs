//! Command-line adapter around `buildbreaker-core`: argument parsing and the
//! HTTP client for the SonarQube web API.

pub mod cli;
pub mod client;

pub use cli::Args;
pub use client::SonarClient;
