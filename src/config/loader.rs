//! Configuration loading from disk.
//!
//! Raw bytes go through environment substitution first, then YAML decoding,
//! then semantic validation. Nothing here touches shared state; the detector
//! decides what to do with the result.

use std::path::Path;
use std::str::Utf8Error;

use thiserror::Error;

use crate::config::env::{expand_env, expand_with};
use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),

    /// Malformed YAML, a type mismatch, or a malformed route.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation failed: {}", join(.0))]
    Invalid(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A decoded config together with the substituted text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: Config,
    pub raw: String,
}

/// Decode raw config bytes, substituting from the process environment.
pub fn load_resource_config(raw: &[u8]) -> Result<Config, ConfigError> {
    let text = std::str::from_utf8(raw)?;
    decode(expand_env(text).into_owned()).map(|loaded| loaded.config)
}

/// Decode raw config bytes, substituting from `lookup`.
pub fn load_resource_config_with<F>(raw: &[u8], lookup: F) -> Result<LoadedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let text = std::str::from_utf8(raw)?;
    decode(expand_with(text, lookup).into_owned())
}

/// Read and decode the config file at `path`.
pub async fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let bytes = tokio::fs::read(path).await?;
    let text = std::str::from_utf8(&bytes)?;
    decode(expand_env(text).into_owned())
}

fn decode(raw: String) -> Result<LoadedConfig, ConfigError> {
    let config: Config = serde_yaml::from_str(&raw)?;
    validate_config(&config).map_err(ConfigError::Invalid)?;
    Ok(LoadedConfig { config, raw })
}
