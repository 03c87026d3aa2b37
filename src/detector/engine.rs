//! Periodic drift detection.
//!
//! # Responsibilities
//! - Reload the allow-list every tick and publish it
//! - Fetch live inventories and reconcile them, one kind at a time
//! - Report counts through the metrics sink

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;

use crate::config::{load_config, AppConfig, ConfigError, LoadedConfig, SpaceConfig};
use crate::detector::reconcile::{reconcile_apps, reconcile_routes, reconcile_spaces, KindReport};
use crate::detector::Kind;
use crate::observability::metrics::MetricsSink;
use crate::platform::{Platform, PlatformError, PlatformResult};

/// Errors raised while constructing a detector.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Detection interval must be positive, got {0} seconds")]
    InvalidInterval(u64),
}

/// What happened to one kind during a tick.
#[derive(Debug)]
pub enum KindOutcome {
    /// Disabled in the allow-list; nothing fetched, nothing recorded.
    Skipped,
    /// The live inventory could not be fetched; gauges were left alone.
    Failed(PlatformError),
    Reconciled(KindReport),
}

impl KindOutcome {
    pub fn report(&self) -> Option<&KindReport> {
        match self {
            KindOutcome::Reconciled(report) => Some(report),
            _ => None,
        }
    }
}

/// Outcome of one tick.
#[derive(Debug)]
pub enum TickReport {
    /// The allow-list failed to load; the tick was skipped.
    ConfigFailed(ConfigError),
    Completed {
        apps: KindOutcome,
        spaces: KindOutcome,
        routes: KindOutcome,
    },
}

impl TickReport {
    /// Outcome for `kind`, or `None` if the tick never got that far.
    pub fn outcome(&self, kind: Kind) -> Option<&KindOutcome> {
        match self {
            TickReport::ConfigFailed(_) => None,
            TickReport::Completed { apps, spaces, routes } => Some(match kind {
                Kind::Apps => apps,
                Kind::Spaces => spaces,
                Kind::Routes => routes,
            }),
        }
    }
}

/// Drives reconciliation on a fixed interval.
pub struct Detector {
    config_path: PathBuf,
    interval: Duration,
    platform: Arc<dyn Platform>,
    sink: Arc<dyn MetricsSink>,
    current: ArcSwapOption<LoadedConfig>,
}

impl Detector {
    pub fn new(
        config_path: impl Into<PathBuf>,
        interval_secs: u64,
        platform: Arc<dyn Platform>,
        sink: Arc<dyn MetricsSink>,
    ) -> Result<Self, DetectorError> {
        if interval_secs == 0 {
            return Err(DetectorError::InvalidInterval(interval_secs));
        }

        Ok(Self {
            config_path: config_path.into(),
            interval: Duration::from_secs(interval_secs),
            platform,
            sink,
            current: ArcSwapOption::empty(),
        })
    }

    /// Run one tick now, then keep ticking in the background.
    ///
    /// Metrics are populated by the time this returns.
    pub async fn start(self, shutdown: broadcast::Receiver<()>) -> Arc<Self> {
        let detector = Arc::new(self);
        detector.tick().await;

        tokio::spawn(detector.clone().run(shutdown));
        detector
    }

    async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            config = %self.config_path.display(),
            "Detector loop starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Detector received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// The most recently loaded allow-list, if any load has succeeded.
    pub fn snapshot(&self) -> Option<Arc<LoadedConfig>> {
        self.current.load_full()
    }

    /// Run a single reconciliation pass.
    pub async fn tick(&self) -> TickReport {
        self.tick_inner().instrument(tracing::info_span!("tick")).await
    }

    async fn tick_inner(&self) -> TickReport {
        let loaded = match load_config(&self.config_path).await {
            Ok(loaded) => Arc::new(loaded),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    config = %self.config_path.display(),
                    "Failed to load config, skipping tick"
                );
                self.sink.record_config_failure();
                return TickReport::ConfigFailed(e);
            }
        };
        self.current.store(Some(loaded.clone()));

        let config = &loaded.config;
        let (apps, spaces, routes) = tokio::join!(
            self.check_apps(&config.app_config),
            self.check_spaces(&config.space_config),
            self.check_routes(&config.app_config),
        );

        TickReport::Completed { apps, spaces, routes }
    }

    async fn check_apps(&self, config: &AppConfig) -> KindOutcome {
        if !config.enabled {
            return KindOutcome::Skipped;
        }
        let result = self
            .platform
            .list_apps()
            .await
            .map(|live| reconcile_apps(config, &live));
        self.record(Kind::Apps, result)
    }

    async fn check_routes(&self, config: &AppConfig) -> KindOutcome {
        if !config.enabled {
            return KindOutcome::Skipped;
        }
        let result = self
            .platform
            .list_routes()
            .await
            .map(|live| reconcile_routes(config, &live));
        self.record(Kind::Routes, result)
    }

    async fn check_spaces(&self, config: &SpaceConfig) -> KindOutcome {
        if !config.enabled {
            return KindOutcome::Skipped;
        }
        let result = self
            .platform
            .list_spaces()
            .await
            .map(|live| reconcile_spaces(config, &live));
        self.record(Kind::Spaces, result)
    }

    fn record(&self, kind: Kind, result: PlatformResult<KindReport>) -> KindOutcome {
        match result {
            Ok(report) => {
                let diff = &report.diff;
                self.sink.set_drift(kind, diff.unknown.len(), diff.missing.len());
                if kind == Kind::Spaces {
                    self.sink.set_ssh_violations(report.ssh_violations.len());
                }
                self.sink.record_check(kind, true);

                tracing::info!(
                    kind = %kind,
                    unknown = diff.unknown.len(),
                    missing = diff.missing.len(),
                    matched = diff.matched.len(),
                    ssh_violations = report.ssh_violations.len(),
                    "Check complete"
                );
                if !diff.unknown.is_empty() || !diff.missing.is_empty() {
                    tracing::debug!(kind = %kind, unknown = ?diff.unknown, missing = ?diff.missing, "Drift detected");
                }
                KindOutcome::Reconciled(report)
            }
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Check failed, keeping previous values");
                self.sink.record_check(kind, false);
                KindOutcome::Failed(e)
            }
        }
    }
}
