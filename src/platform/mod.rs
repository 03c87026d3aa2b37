//! Platform inventory subsystem.
//!
//! # Data Flow
//! ```text
//! Environment / flags (API URL, credentials)
//!     → client.rs (CF v3 HTTP client with timeouts, token handling)
//!     → types.rs (wire shapes, pagination)
//!     → Platform trait (flat name sets consumed by the detector)
//! ```
//!
//! # Design Decisions
//! - Read-only: the detector never mutates the platform
//! - Each inventory fails independently with a kind-scoped error
//! - Timeouts are owned here, not by the detector loop
//! - No retries; the next tick is the retry

pub mod client;
pub mod types;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

pub use client::CloudFoundryClient;

/// Errors that can occur while fetching an inventory.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Transport failure (connection refused, TLS, reset).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded the client timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// No usable credentials, or the token exchange failed.
    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Live inventories of the platform.
///
/// Implementations must bound every call with their own timeout.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Names of all deployed applications.
    async fn list_apps(&self) -> PlatformResult<HashSet<String>>;

    /// All spaces as `(name, ssh_enabled)` pairs.
    ///
    /// Names are only unique per organization, so a name may appear more
    /// than once with different SSH settings.
    async fn list_spaces(&self) -> PlatformResult<HashSet<(String, bool)>>;

    /// All routes as `host.domain` strings.
    async fn list_routes(&self) -> PlatformResult<HashSet<String>>;
}
