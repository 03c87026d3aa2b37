//! Process startup settings.
//!
//! Everything here is fixed for the lifetime of the process. The allow-list
//! itself lives in the file named by `config` and is re-read every tick.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Default detection interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Parser)]
#[command(name = "watchtower")]
#[command(about = "Detects drift between a platform's deployed resources and an allow-list", long_about = None)]
pub struct Settings {
    /// Path to the allow-list configuration file.
    #[arg(long, env = "WATCHTOWER_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Seconds between validation checks.
    #[arg(long, env = "WATCHTOWER_INTERVAL", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Port for the metrics and config endpoints.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[command(flatten)]
    pub platform: PlatformSettings,
}

/// Connection settings for the platform API.
#[derive(Debug, Clone, clap::Args)]
pub struct PlatformSettings {
    /// Base URL of the Cloud Foundry API.
    #[arg(long = "cf-api", env = "CF_API", default_value = "http://localhost:9022")]
    pub api_url: String,

    /// Pre-issued bearer token; takes precedence over client credentials.
    #[arg(long = "cf-token", env = "CF_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long = "cf-client-id", env = "CF_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long = "cf-client-secret", env = "CF_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Timeout applied to every platform request, in seconds.
    #[arg(long = "cf-timeout", env = "CF_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Settings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

impl PlatformSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
