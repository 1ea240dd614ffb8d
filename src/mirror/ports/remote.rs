//! Error type shared by every remote-system port.

use std::sync::Arc;
use thiserror::Error;

/// Result type for remote-system port operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors returned by remote-system adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The remote answered with a non-success status.
    #[error("{service} rejected the request with status {status}: {body}")]
    Rejected {
        /// Remote system name.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The remote accepted the request but reported query errors.
    #[error("{service} query failed: {message}")]
    Query {
        /// Remote system name.
        service: &'static str,
        /// Joined error messages.
        message: String,
    },

    /// The response could not be decoded into domain values.
    #[error("{service} returned an unreadable response: {message}")]
    Decode {
        /// Remote system name.
        service: &'static str,
        /// Decoding failure.
        message: String,
    },

    /// The request never completed.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The addressed record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
}

impl RemoteError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Builds a decode error for `service`.
    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            service,
            message: message.into(),
        }
    }
}
