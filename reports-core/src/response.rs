//! Response records flowing back through the pipeline.
//!
//! A [`ResponseRecord`] is created by the terminal transport (or restored from
//! a cache store) and travels outwards through every stage. It keeps two body
//! representations side by side:
//!
//! - the **raw body**, always present, which is what cache stores persist
//! - the **decoded body**, a JSON value set only by the decoding stage
//!
//! Decoding never touches the raw bytes, so a record can be cached after it
//! has been decoded for downstream consumers.

use std::fmt;

use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};

use crate::Raw;

/// How the cache stage produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// Served from the store without contacting the network.
    Hit,
    /// Fetched from the network.
    Miss,
    /// Stored entry confirmed by a `304 Not Modified`.
    Revalidated,
}

impl CacheStatus {
    /// Static label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Revalidated => "revalidated",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status, headers and body of a response.
///
/// Equality compares status, headers and raw body only. The decoded body is
/// derived from the raw body and the cache status describes where the record
/// came from, not what it contains.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    status: StatusCode,
    headers: HeaderMap,
    body: Raw,
    decoded: Option<serde_json::Value>,
    cache_status: Option<CacheStatus>,
}

impl ResponseRecord {
    /// Creates a record with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self::from_parts(status, HeaderMap::new(), Bytes::new())
    }

    /// Creates a record from its stored parts.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<Raw>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            decoded: None,
            cache_status: None,
        }
    }

    /// Builder-style header insertion. Invalid names or values are skipped.
    pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Builder-style body replacement.
    pub fn with_body(mut self, body: impl Into<Raw>) -> Self {
        self.body = body.into();
        self.decoded = None;
        self
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Looks a header up by name and returns it as text.
    ///
    /// Returns `None` when the header is missing or not visible ASCII.
    pub fn header_str<K>(&self, name: K) -> Option<&str>
    where
        K: header::AsHeaderName,
    {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Raw body bytes, exactly as received.
    pub fn body(&self) -> &Raw {
        &self.body
    }

    /// Decoded JSON body, if the decoding stage ran on this record.
    pub fn decoded(&self) -> Option<&serde_json::Value> {
        self.decoded.as_ref()
    }

    /// Attaches a decoded body. The raw body is left untouched.
    pub fn set_decoded(&mut self, value: serde_json::Value) {
        self.decoded = Some(value);
    }

    /// Takes the decoded body out of the record.
    pub fn take_decoded(&mut self) -> Option<serde_json::Value> {
        self.decoded.take()
    }

    /// Whether the `Content-Type` announces JSON.
    pub fn is_json(&self) -> bool {
        self.header_str(header::CONTENT_TYPE)
            .map(|value| {
                let mime = value.split(';').next().unwrap_or_default().trim();
                mime.eq_ignore_ascii_case("application/json")
                    || (mime.starts_with("application/") && mime.ends_with("+json"))
            })
            .unwrap_or(false)
    }

    /// How the cache stage produced this record, if it was consulted.
    pub fn cache_status(&self) -> Option<CacheStatus> {
        self.cache_status
    }

    /// Records how the cache stage produced this record.
    pub fn set_cache_status(&mut self, status: CacheStatus) {
        self.cache_status = Some(status);
    }

    /// Returns a copy suitable for persisting: decoded body and cache status
    /// are dropped.
    pub fn to_stored(&self) -> Self {
        Self::from_parts(self.status, self.headers.clone(), self.body.clone())
    }

    /// Consumes the record and returns its stored parts.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Raw) {
        (self.status, self.headers, self.body)
    }
}

impl PartialEq for ResponseRecord {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.headers == other.headers && self.body == other.body
    }
}

impl Eq for ResponseRecord {}
