//! Treasury reconciliation.
//!
//! Walks every currency journal and every debt, prints the report as JSON on
//! stdout and exits with status 1 if anything drifted.
//!
//! Usage: cargo run --bin reconciler

use std::process::ExitCode;

use anyhow::Context;
use sarraf_db::ReconciliationRepository;
use sarraf_shared::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sarraf=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = sarraf_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;

    let report = ReconciliationRepository::new(db).reconcile().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.is_clean() {
        info!("Treasury reconciled");
        Ok(ExitCode::SUCCESS)
    } else {
        let drifted = report.currencies.iter().filter(|c| !c.is_clean()).count()
            + report.debts.iter().filter(|d| !d.is_clean()).count();
        warn!(drifted, "Treasury drift detected");
        Ok(ExitCode::FAILURE)
    }
}
