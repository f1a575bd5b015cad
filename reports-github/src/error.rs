//! Errors surfaced by the GitHub client.

use http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Result alias for client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by [`GitHubClient`](crate::GitHubClient) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested user does not exist.
    #[error("'{0}' does not exist")]
    NonexistentUser(String),

    /// GitHub refused to create a gist, usually because a file is empty.
    #[error("gist creation failed: {0}")]
    GistCreationFailure(String),

    /// Credentials are missing, invalid, or lack the required scope.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// A whitelisted status that the operation cannot use.
    #[error("unexpected response {status}: {message}")]
    UnexpectedResponse {
        /// Status returned by GitHub.
        status: StatusCode,
        /// GitHub's `message`, or the canonical reason.
        message: String,
    },

    /// The client could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure inside the request pipeline (transport, status check, decoding).
    #[error(transparent)]
    Pipeline(#[from] reports_core::Error),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Pipeline(reports_core::Error::Decode(error))
    }
}
