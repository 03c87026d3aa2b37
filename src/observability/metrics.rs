//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watchtower_{app,space,route}_checks_{success,failed}_total` (counter):
//!   per-kind check outcomes
//! - `watchtower_unknown_{apps,spaces,app_routes}_total` (gauge): deployed
//!   but not allowed
//! - `watchtower_missing_{apps,spaces,app_routes}_total` (gauge): allowed,
//!   required and not deployed
//! - `watchtower_ssh_space_misconfiguration_total` (gauge): spaces whose SSH
//!   setting disagrees with the allow-list
//! - `watchtower_config_load_failed_total` (counter): ticks skipped because
//!   the allow-list could not be loaded
//!
//! # Design Decisions
//! - Gauges hold the last successful measurement; a failed fetch leaves them
//! - Counters are registered at zero on startup, gauges on first measurement

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::detector::Kind;

const CONFIG_LOAD_FAILED: &str = "watchtower_config_load_failed_total";
const SSH_VIOLATIONS: &str = "watchtower_ssh_space_misconfiguration_total";

/// Metric names for one resource kind.
struct KindMetrics {
    success: &'static str,
    failed: &'static str,
    unknown: &'static str,
    missing: &'static str,
}

fn names(kind: Kind) -> KindMetrics {
    match kind {
        Kind::Apps => KindMetrics {
            success: "watchtower_app_checks_success_total",
            failed: "watchtower_app_checks_failed_total",
            unknown: "watchtower_unknown_apps_total",
            missing: "watchtower_missing_apps_total",
        },
        Kind::Spaces => KindMetrics {
            success: "watchtower_space_checks_success_total",
            failed: "watchtower_space_checks_failed_total",
            unknown: "watchtower_unknown_spaces_total",
            missing: "watchtower_missing_spaces_total",
        },
        Kind::Routes => KindMetrics {
            success: "watchtower_route_checks_success_total",
            failed: "watchtower_route_checks_failed_total",
            unknown: "watchtower_unknown_app_routes_total",
            missing: "watchtower_missing_app_routes_total",
        },
    }
}

/// Destination for detector results.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// tick while other kinds may be reconciling concurrently.
pub trait MetricsSink: Send + Sync {
    /// Count one check of `kind`, successful or not.
    fn record_check(&self, kind: Kind, success: bool);

    /// Set the drift gauges of `kind`.
    fn set_drift(&self, kind: Kind, unknown: usize, missing: usize);

    /// Set the number of spaces with a mismatched SSH setting.
    fn set_ssh_violations(&self, count: usize);

    /// Count one tick skipped because the allow-list failed to load.
    fn record_config_failure(&self);
}

/// Sink backed by the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusSink;

impl PrometheusSink {
    /// Describe every metric and register the counters at zero.
    pub fn new() -> Self {
        for kind in Kind::ALL {
            let n = names(kind);
            describe_counter!(n.success, format!("Number of times the {} check has succeeded", kind));
            describe_counter!(n.failed, format!("Number of times the {} check has failed for any reason", kind));
            describe_gauge!(n.unknown, format!("Number of {} deployed that are not in the allow-list", kind));
            describe_gauge!(n.missing, format!("Number of {} in the allow-list that are not deployed", kind));
            counter!(n.success).increment(0);
            counter!(n.failed).increment(0);
        }
        describe_gauge!(SSH_VIOLATIONS, "Number of spaces that have misconfigured SSH access settings");
        describe_counter!(CONFIG_LOAD_FAILED, "Number of ticks skipped because the config could not be loaded");
        counter!(CONFIG_LOAD_FAILED).increment(0);
        Self
    }
}

impl MetricsSink for PrometheusSink {
    fn record_check(&self, kind: Kind, success: bool) {
        let n = names(kind);
        let name = if success { n.success } else { n.failed };
        counter!(name).increment(1);
    }

    fn set_drift(&self, kind: Kind, unknown: usize, missing: usize) {
        let n = names(kind);
        gauge!(n.unknown).set(unknown as f64);
        gauge!(n.missing).set(missing as f64);
    }

    fn set_ssh_violations(&self, count: usize) {
        gauge!(SSH_VIOLATIONS).set(count as f64);
    }

    fn record_config_failure(&self) {
        counter!(CONFIG_LOAD_FAILED).increment(1);
    }
}

/// Install the Prometheus recorder as the global recorder.
///
/// The returned handle renders the exposition text for `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}
