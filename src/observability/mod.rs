//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Detector ticks produce:
//!     → logging.rs (structured log events, one span per tick)
//!     → metrics.rs (check counters, drift gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//! ```
//!
//! # Design Decisions
//! - The detector talks to a `MetricsSink` trait, never to globals directly
//! - Metrics are cheap (atomic increments)
//! - Gauges are only written after a successful measurement

pub mod logging;
pub mod metrics;
