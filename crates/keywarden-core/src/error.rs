//! Error types for Keywarden

use thiserror::Error;

/// Result type alias for Keywarden operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Keywarden.
///
/// Probe failures observed while validating a credential never surface
/// through this type; the validation engine folds them into a
/// [`ValidationOutcome`](crate::validate::ValidationOutcome). `Error` is
/// reserved for the paths that genuinely fail: the store, the registry
/// lookup, and user input plumbing.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Credential store errors. Fatal only when the store cannot be
    /// loaded or created at startup.
    #[error("Store error: {message}")]
    Store {
        message: String,
        path: Option<String>,
    },

    /// Transport errors from a completion probe call
    #[error("Probe error: {message}")]
    Probe {
        message: String,
        provider: Option<String>,
    },

    /// Requested provider id is not in the registry
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Invalid user input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Session was cancelled by the user
    #[error("Operation was cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            path: None,
        }
    }

    /// Create a store error carrying the backing file path
    pub fn store_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new probe error
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
            provider: None,
        }
    }

    /// Create a probe error with provider
    pub fn probe_with_provider(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
