//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse settings → Install metrics → Build platform client
//!     → Start detector (first tick awaited) → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Detector loop exits → Server drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Metrics are populated before the listener accepts scrapes
//! - Listener bind failure is the only fatal startup error after parsing

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_on_signal;
