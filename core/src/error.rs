//! Error types for the data-source client and configuration.
//!
//! # Design
//! The state machines know exactly one failure kind: a data-source failure
//! with a human-readable message. `ApiError` keeps enough structure for
//! logging and the FFI error codes, while its `Display` output is the message
//! stored verbatim in `DashboardState::error` / `ProfileState::error`.

use thiserror::Error;

/// Errors returned by `DataSourceClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The source answered with a non-2xx status. The message is fixed per
    /// resource ("Failed to fetch comments", "Failed to fetch user").
    #[error("Failed to fetch {resource}")]
    UnexpectedStatus { resource: &'static str, status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The host never obtained a response (DNS, connection refused, ...).
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the source answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::Deserialization(_) | ApiError::Transport(_) => None,
        }
    }
}

/// Invalid values found while building `DashboardConfig`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a valid number, got {value:?}")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} must be one of {allowed:?}, got {value}")]
    NotAllowed {
        key: &'static str,
        value: u32,
        allowed: &'static [u32],
    },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}
