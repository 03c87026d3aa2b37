//! Configuration schema definitions.
//!
//! This module defines the allow-list document the detector reconciles
//! against. All types derive Serde traits for deserialization from the YAML
//! config file; route strings are decomposed while decoding.

use serde::{Deserialize, Deserializer};

use crate::config::route::RouteEntry;

/// Root allow-list snapshot.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Application (and route) allow-list.
    #[serde(default, rename = "apps")]
    pub app_config: AppConfig,

    /// Space allow-list and expected SSH policy.
    #[serde(default, rename = "spaces")]
    pub space_config: SpaceConfig,
}

/// Application allow-list.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Disables application and route reconciliation when false.
    #[serde(deserialize_with = "lenient_bool")]
    pub enabled: bool,

    /// Allowed applications, in declaration order.
    #[serde(default, rename = "resources")]
    pub apps: Vec<AppEntry>,
}

/// A single allowed application.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppEntry {
    /// Platform-level application name.
    pub name: String,

    /// Tolerate the application being absent from the platform.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub optional: bool,

    /// Routes bound to this application.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Space allow-list.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct SpaceConfig {
    /// Disables space reconciliation when false.
    #[serde(deserialize_with = "lenient_bool")]
    pub enabled: bool,

    /// Allowed spaces, in declaration order.
    #[serde(default, rename = "resources")]
    pub spaces: Vec<SpaceEntry>,
}

/// A single allowed space.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SpaceEntry {
    pub name: String,

    /// Expected SSH access setting for the space.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub allow_ssh: bool,
}

/// Accepts a YAML boolean or the strings "true"/"false".
///
/// Substituted values that end up quoted in the document still decode as
/// booleans this way.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(serde::de::Error::custom(format!(
                "expected a boolean, found {:?}",
                s
            ))),
        },
    }
}
