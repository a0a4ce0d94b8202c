//! Client error types

use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => err.status().map(|status| status.as_u16()),
            Self::ServerError { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// Whether the server rejected the credentials (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
