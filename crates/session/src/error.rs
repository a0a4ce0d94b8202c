//! Session error types

use std::sync::Arc;
use thiserror::Error;
use turnstile_core::StoreError;
use turnstile_http::ClientError;

/// Session-level failures
///
/// `Clone` so that one refresh outcome can be handed to every caller waiting
/// on it.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// A refresh was attempted with no refresh token stored
    #[error("No refresh token present")]
    NoRefreshToken,

    /// A refresh after a 401 did not restore a valid session
    #[error("Unauthorized")]
    Unauthorized,

    /// The authentication service or the network failed; passed through as is
    #[error(transparent)]
    Transport(Arc<ClientError>),

    /// The token store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// The underlying transport error, if any
    pub fn transport(&self) -> Option<&ClientError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for SessionError {
    fn from(err: ClientError) -> Self {
        Self::Transport(Arc::new(err))
    }
}
