//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject entries that cannot identify a platform resource
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Duplicate names are not rejected

use std::fmt;

use crate::config::schema::Config;

/// A single semantic problem in an otherwise well-formed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An application entry at the given index has an empty name.
    EmptyAppName(usize),
    /// A space entry at the given index has an empty name.
    EmptySpaceName(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyAppName(i) => write!(f, "apps.resources[{}]: empty name", i),
            ValidationError::EmptySpaceName(i) => {
                write!(f, "spaces.resources[{}]: empty name", i)
            }
        }
    }
}

pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (i, app) in config.app_config.apps.iter().enumerate() {
        if app.name.trim().is_empty() {
            errors.push(ValidationError::EmptyAppName(i));
        }
    }
    for (i, space) in config.space_config.spaces.iter().enumerate() {
        if space.name.trim().is_empty() {
            errors.push(ValidationError::EmptySpaceName(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
