//! Watchtower
//!
//! Audits a platform's deployed applications, routes and spaces against a
//! declarative allow-list and exports the drift as Prometheus metrics.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.yaml ──▶ config::loader ──▶ Config snapshot ──┐
//!                                                         ▼
//!   platform API ◀── platform::client ◀──────────── detector (every interval)
//!                                                         │
//!                                                         ▼
//!   Prometheus ◀── GET /metrics ◀── observability::metrics (counters, gauges)
//!   operators  ◀── GET /config  ◀── latest snapshot (raw text)
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use watchtower::config::Settings;
use watchtower::detector::Detector;
use watchtower::http::{AppState, HttpServer};
use watchtower::lifecycle::{shutdown_on_signal, Shutdown};
use watchtower::observability::{logging, metrics};
use watchtower::platform::CloudFoundryClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let settings = Settings::parse();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %settings.config.display(),
        interval_secs = settings.interval,
        port = settings.port,
        api_url = %settings.platform.api_url,
        "watchtower starting"
    );

    let prometheus = metrics::init_metrics()?;
    let sink = Arc::new(metrics::PrometheusSink::new());
    let platform = Arc::new(CloudFoundryClient::new(settings.platform.clone())?);

    let shutdown = Shutdown::new();
    let detector = Detector::new(&settings.config, settings.interval, platform, sink)?
        .start(shutdown.subscribe())
        .await;

    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    let server = HttpServer::new(AppState {
        detector,
        metrics: prometheus,
    });

    let signals = shutdown.clone();
    tokio::spawn(async move { shutdown_on_signal(&signals).await });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
