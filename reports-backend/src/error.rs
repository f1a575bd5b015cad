//! Error types for store operations.

use crate::format::FormatError;
use thiserror::Error;

/// Error type for store operations.
///
/// This enum categorizes errors that can occur during cache store interactions
/// into distinct groups for appropriate handling. The cache stage never lets
/// these reach the caller: a failed read is a miss, a failed write is logged.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal store error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote stores (e.g., Redis).
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),

    /// Serialization or deserialization error.
    #[error(transparent)]
    FormatError(#[from] FormatError),
}
