//! HTTP surface.
//!
//! # Endpoints
//! ```text
//! GET /metrics → Prometheus exposition of the detector metrics
//! GET /config  → the allow-list as last loaded, after substitution
//! GET /health  → liveness
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
