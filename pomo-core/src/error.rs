//! Errors surfaced by the session core.
//!
//! The core does no I/O, so the only failure it reports is a rejected
//! configuration value. The caller keeps the previous value and decides how
//! to surface the rejection.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfiguration { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
