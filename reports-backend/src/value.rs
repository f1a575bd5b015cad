//! Persisted form of a response record.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use reports_core::ResponseRecord;
use serde::{Deserialize, Serialize};

/// A response as written to a cache store: status, headers and raw body.
///
/// The decoded body and cache status of a [`ResponseRecord`] are not part of
/// the stored form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl CachedResponse {
    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Estimated memory usage in bytes, used by weighted in-memory stores.
    pub fn memory_size(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.len())
            .sum();
        std::mem::size_of::<Self>() + headers + self.body.len()
    }
}

impl From<&ResponseRecord> for CachedResponse {
    fn from(record: &ResponseRecord) -> Self {
        let (status, headers, body) = record.to_stored().into_parts();
        CachedResponse {
            status,
            headers,
            body,
        }
    }
}

impl From<ResponseRecord> for CachedResponse {
    fn from(record: ResponseRecord) -> Self {
        let (status, headers, body) = record.into_parts();
        CachedResponse {
            status,
            headers,
            body,
        }
    }
}

impl From<CachedResponse> for ResponseRecord {
    fn from(cached: CachedResponse) -> Self {
        ResponseRecord::from_parts(cached.status, cached.headers, cached.body)
    }
}
