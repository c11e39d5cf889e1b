//! Seeding error types.

use thiserror::Error;

/// Error raised while provisioning a realm or seeding its users.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Admin credentials rejected or token endpoint unreachable.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Realm probe or creation failed.
    #[error("failed to provision realm '{realm}': {status} - {message}")]
    Provisioning {
        /// Realm name.
        realm: String,
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The server kept rejecting the access token after a refresh.
    #[error("access token rejected after refresh while creating user '{username}'")]
    Unauthorized {
        /// Username of the affected record.
        username: String,
    },

    /// User creation failed with a non-recoverable status.
    #[error("failed to create user '{username}': {status} - {message}")]
    Creation {
        /// Username of the affected record.
        username: String,
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A worker task panicked or was torn down unexpectedly.
    #[error("worker failed: {0}")]
    Worker(String),
}

/// Seeding result type.
pub type SeedResult<T> = Result<T, SeedError>;
