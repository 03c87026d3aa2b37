//! Drift detection subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (engine.rs)
//!     → reload allow-list (config::loader)
//!     → publish snapshot (atomic swap, read by /config)
//!     → per kind, concurrently:
//!         fetch live inventory (platform)
//!         → diff against allow-list (reconcile.rs)
//!         → update counters and gauges (MetricsSink)
//! ```
//!
//! # State Machine (per tick)
//! ```text
//! Idle → Loading
//! Loading → (parse failure) → skip tick, gauges retained → Idle
//! Loading → Reconciling
//! Reconciling → per kind: Skipped | Failed (gauges retained) | Reconciled
//! all kinds done → Idle
//! ```
//!
//! # Design Decisions
//! - Ticks never overlap; a slow tick delays the next one
//! - Kinds are independent: one failing fetch never blocks the others
//! - Stale gauges are preferred over resetting to zero

pub mod engine;
pub mod reconcile;

use std::fmt;

pub use engine::{Detector, DetectorError, KindOutcome, TickReport};
pub use reconcile::{Diff, KindReport};

/// A category of platform resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Apps,
    Spaces,
    Routes,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Apps, Kind::Spaces, Kind::Routes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Apps => "apps",
            Kind::Spaces => "spaces",
            Kind::Routes => "routes",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
