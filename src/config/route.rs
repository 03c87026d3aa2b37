//! Route decomposition.
//!
//! A declared route is written as a single string, `<host>.<domain>`, where
//! the domain may itself contain dots. The host is everything before the
//! first separator.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

const SEPARATOR: char = '.';

/// A route string without any separator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed route {0:?}: expected <host>.<domain>")]
pub struct MalformedRouteError(pub String);

/// Host and domain of a declared route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RouteEntry {
    host: String,
    domain: String,
}

impl RouteEntry {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.host, SEPARATOR, self.domain)
    }
}

impl TryFrom<String> for RouteEntry {
    type Error = MalformedRouteError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        parse_route(&raw)
    }
}

/// Split a raw route at its first separator.
pub fn parse_route(raw: &str) -> Result<RouteEntry, MalformedRouteError> {
    match raw.split_once(SEPARATOR) {
        Some((host, domain)) => Ok(RouteEntry {
            host: host.to_string(),
            domain: domain.to_string(),
        }),
        None => Err(MalformedRouteError(raw.to_string())),
    }
}
