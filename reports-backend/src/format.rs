//! Serialization formats for stores that keep entries as bytes.
//!
//! In-process stores keep [`CachedResponse`] values as they are; networked
//! stores need a byte representation, chosen through [`Format`].

use bytes::Bytes;
use thiserror::Error;

use crate::value::CachedResponse;

/// Error raised while encoding or decoding a stored entry.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The entry could not be encoded.
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    /// The stored bytes could not be decoded.
    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// Byte encoding of cached entries.
pub trait Format: std::fmt::Debug + Send + Sync {
    /// Encodes an entry.
    fn serialize(&self, value: &CachedResponse) -> Result<Bytes, FormatError>;

    /// Decodes an entry.
    fn deserialize(&self, data: &[u8]) -> Result<CachedResponse, FormatError>;
}

/// JSON format (default).
///
/// Bodies are stored as byte arrays so binary payloads survive unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize(&self, value: &CachedResponse) -> Result<Bytes, FormatError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| FormatError::Serialize(Box::new(e)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<CachedResponse, FormatError> {
        serde_json::from_slice(data).map_err(|e| FormatError::Deserialize(Box::new(e)))
    }
}
