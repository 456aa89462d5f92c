//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can occur during authentication operations.
///
/// Credential rejection, transport failure, and malformed responses all
/// collapse into one reportable kind: downstream UI only displays the
/// message. `Display` renders that message directly.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the request (bad credentials, existing account).
    /// Carries the server-provided message when one was available.
    #[error("{message}")]
    Rejected {
        /// Human-readable reason, shown to the user as-is.
        message: String,
    },

    /// The network request failed.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server response could not be understood.
    #[error("malformed server response: {0}")]
    Malformed(String),

    /// The persisted session store failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Api { message, .. } => Self::Rejected { message },
            ApiError::Http(e) => Self::Transport(e),
            ApiError::Parse(e) => Self::Malformed(e.to_string()),
            ApiError::Malformed(m) | ApiError::NotFound(m) => Self::Malformed(m),
            ApiError::Url(e) => Self::Malformed(e.to_string()),
        }
    }
}
