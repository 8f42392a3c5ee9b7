#![forbid(unsafe_code)]

//! Breaks the build when the SonarQube quality gate fails.

use buildbreaker::{Args, SonarClient};
use buildbreaker_core::{Outcome, QualityGateBreaker};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let breaker = QualityGateBreaker::new(args.resolve_config()?);
    let outcome = breaker
        .execute(|metadata| {
            let server_url = breaker.config().resolve_server_url(metadata)?;
            info!(server = server_url, "connecting");
            SonarClient::new(server_url, args.token.clone(), args.http_timeout())
        })
        .await?;

    match outcome {
        Outcome::Skipped => info!("nothing to check"),
        Outcome::Passed(verdict) => info!(
            status = %verdict.status,
            failed_conditions = verdict.error_count,
            "quality gate check passed"
        ),
    }

    Ok(())
}
