//! BEBB catalogue - fetch, cache and extract letter records
//!
//! Prints one JSON object of extracted attributes per fetched record.

use anyhow::Context;
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bebb_catalogue::{
    config::{AppConfig, LoggingConfig},
    marc::extract_all,
    models::RunMode,
    services::{numbers::NumberSource, CacheStore, Retriever, RetryingClient, Z3950Client},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Starting BEBB catalogue v{}", env!("CARGO_PKG_VERSION"));

    let mode = RunMode::try_from(&config.run).context("Invalid run configuration")?;
    tracing::info!("Is force run: {}", mode.force);
    tracing::info!("Is test run: {}", mode.test);

    let numbers = NumberSource::new(&config.input, &mode)
        .numbers_to_fetch()
        .context("Failed to determine system numbers")?;

    let cache = CacheStore::new(&config.cache, &mode);
    cache
        .ensure_root()
        .with_context(|| format!("Failed to create cache at {}", cache.root().display()))?;

    let client = RetryingClient::new(
        Z3950Client::new(&config.catalogue),
        config.catalogue.timeout(),
        config.catalogue.retries,
    );
    tracing::info!(
        "Catalogue: {} (database: {})",
        config.catalogue.address(),
        config.catalogue.database
    );

    let retriever = Retriever::new(cache, Box::new(client), mode);
    let report = retriever.get_all(&numbers).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for fetched in &report.records {
        serde_json::to_writer(&mut out, &extract_all(&fetched.record))?;
        writeln!(out)?;
    }
    out.flush()?;

    for failure in &report.failures {
        tracing::warn!(
            "Not fetched: {} ({:?}): {}",
            failure.system_number,
            failure.kind,
            failure.message
        );
    }
    tracing::info!(
        "Finished in {}s",
        (report.finished_at - report.started_at).num_seconds()
    );

    Ok(())
}

/// Logs go to stderr; stdout carries the extracted records
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bebb_catalogue={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
