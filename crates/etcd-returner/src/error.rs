//! Error types for the etcd returner.

/// Returner errors.
///
/// Failures from the store are not retried or wrapped in recovery logic; they
/// propagate to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum ReturnerError {
    /// The etcd client capability is not available in this build.
    #[error("returner unavailable: {reason}")]
    Unavailable { reason: String },

    /// Key (or directory) does not exist in the store.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// Authentication failed or credentials were rejected.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The store rejected the request with an etcd error code.
    #[error("etcd error {code} on {key}: {message}")]
    Store {
        code: u64,
        key: String,
        message: String,
    },

    /// Network error.
    #[error("network error: {message}")]
    Network { message: String },

    /// Invalid response from the store.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Job return record is missing a required field.
    #[error("invalid job return: {message}")]
    InvalidRecord { message: String },

    /// JSON encoding or decoding of a stored value failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReturnerError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::KeyNotFound { .. } => 2,
            Self::Unauthorized { .. } => 3,
            Self::Config { .. } | Self::Unavailable { .. } => 4,
            _ => 1,
        }
    }

    /// Returns true if this error indicates a missing key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ReturnerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for returner operations.
pub type ReturnerResult<T> = Result<T, ReturnerError>;
