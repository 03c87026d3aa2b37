//! Drift detection between a platform's live resources and an allow-list.

pub mod config;
pub mod detector;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod platform;

pub use config::{Config, LoadedConfig};
pub use detector::Detector;
pub use lifecycle::Shutdown;
