//! services/client/src/error.rs
//!
//! Defines the primary error type for the entire client.

use crate::config::ConfigError;
use snooze_core::domain::InvalidUrlError;
use snooze_core::ports::BackendError;
use snooze_core::session::{FavoriteError, SignupError};

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the remote-service port.
    #[error("Remote service error: {0}")]
    Backend(#[from] BackendError),

    /// Represents a rejected account registration.
    #[error("Signup error: {0}")]
    Signup(#[from] SignupError),

    /// Represents a favorite change the service did not confirm.
    #[error("Favorite error: {0}")]
    Favorite(#[from] FavoriteError),

    /// A story whose URL cannot be rendered.
    #[error("Story URL error: {0}")]
    InvalidUrl(#[from] InvalidUrlError),

    /// Represents a standard Input/Output error (e.g., the credential file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
