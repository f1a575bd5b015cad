//! Error types for Redis store operations.
//!
//! All errors convert into [`BackendError`] so the cache stage handles them
//! like any other store failure.
//!
//! [`BackendError`]: reports_backend::BackendError

use reports_backend::BackendError;
use redis::RedisError;

/// Error type for Redis store operations.
///
/// Returned by [`RedisStoreBuilder::build`] for an invalid connection URL,
/// and on the first cache operation when Redis is unreachable, since the
/// connection is established lazily.
///
/// [`RedisStoreBuilder::build`]: crate::RedisStoreBuilder::build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    #[error("Redis store error: {0}")]
    Redis(#[from] RedisError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match error {
            Error::Redis(err) if err.is_io_error() || err.is_connection_dropped() => {
                Self::ConnectionError(Box::new(err))
            }
            other => Self::InternalError(Box::new(other)),
        }
    }
}
