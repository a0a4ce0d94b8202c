//! Error types shared across the Turnstile crates

/// Result type for token store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Token store failures
///
/// Absence of a value is never an error; stores report it as `Ok(None)`.
/// Must stay `Clone`: a refresh outcome is handed to every waiting caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("IO operation failed: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl StoreError {
    /// Create an unavailable-backend error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}
