//! Error types for pipeline execution.

use http::StatusCode;
use thiserror::Error;

/// Boxed error used for transport failures coming from an HTTP client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the pipeline.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while executing a request through the pipeline.
///
/// Stages only ever add [`Error::RequestFailure`] and [`Error::Decode`];
/// transport errors travel back through every stage unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// The terminal transport failed (connection refused, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response status is not one the caller accepts.
    #[error("request failed with status {status}: {message}")]
    RequestFailure {
        /// Status code returned by the server.
        status: StatusCode,
        /// Server supplied message, or the canonical reason phrase.
        message: String,
    },

    /// A JSON response body could not be parsed.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Wraps any client error as a transport failure.
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Transport(error.into())
    }
}
