//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! allow-list file (YAML)
//!     → env.rs (${NAME} / $NAME substitution on the raw text)
//!     → loader.rs (deserialize, routes decomposed by route.rs)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → published by the detector via atomic swap
//!
//! Every detector tick:
//!     loader.rs reloads the file
//!     → on success the new snapshot replaces the old one
//!     → on failure the old snapshot stays in place
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; edits take effect on the next tick
//! - Kinds missing from the document are disabled
//! - Validation separates syntactic (serde) from semantic checks
//! - Startup settings (settings.rs) are separate from the allow-list

pub mod env;
pub mod loader;
pub mod route;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, load_resource_config, ConfigError, LoadedConfig};
pub use route::{parse_route, MalformedRouteError, RouteEntry};
pub use schema::{AppConfig, AppEntry, Config, SpaceConfig, SpaceEntry};
pub use settings::{PlatformSettings, Settings};
