//! HTTP caching metadata helpers.
//!
//! Everything here is total: malformed or missing headers never produce an
//! error. They degrade to "freshness indeterminate" or "no revalidation
//! possible", which the cache stage treats conservatively.
//!
//! ## Directive matching
//!
//! `Cache-Control` directives are matched as tokens: the value is split on
//! commas, each piece is trimmed and compared case-insensitively. The value
//! `"public, no-cache"` therefore carries `no-cache`, while `"no-cache-ish"`
//! does not.
//!
//! ```
//! use reports_core::headers::CacheControl;
//!
//! let directives = CacheControl::parse("Public, No-Cache, max-age=60");
//! assert!(directives.has("no-cache"));
//! assert!(directives.requires_revalidation());
//! assert_eq!(directives.max_age(), Some(60));
//! ```

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::{self, HeaderValue};
use lazy_static::lazy_static;
use regex::Regex;

use crate::response::ResponseRecord;

lazy_static! {
    static ref MAX_AGE: Regex =
        Regex::new(r#"(?i)(?:^|[\s,])max-age\s*=\s*"?(\d+)"?"#).expect("valid max-age pattern");
}

/// Directive that forbids storing a response.
pub const NO_STORE: &str = "no-store";
/// Directive that forbids serving a stored response without revalidation.
pub const NO_CACHE: &str = "no-cache";
/// Directive that forbids serving a stale response without revalidation.
pub const MUST_REVALIDATE: &str = "must-revalidate";

/// Parsed `Cache-Control` header value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    raw: String,
    tokens: Vec<String>,
}

impl CacheControl {
    /// Parses a header value into lowercase directive tokens.
    pub fn parse(value: &str) -> Self {
        let tokens = value
            .split(',')
            .map(|token| token.trim().to_ascii_lowercase())
            .filter(|token| !token.is_empty())
            .collect();
        Self {
            raw: value.to_owned(),
            tokens,
        }
    }

    /// Reads `Cache-Control` from a header map.
    ///
    /// Returns `None` when the header is absent. Repeated header lines are
    /// joined with commas, the same way a proxy would fold them.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let values: Vec<&str> = headers
            .get_all(header::CACHE_CONTROL)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(Self::parse(&values.join(", ")))
    }

    /// Whether a directive is present, compared case-insensitively.
    ///
    /// Directives with arguments match on their name: `has("max-age")` is true
    /// for `max-age=60`.
    pub fn has(&self, directive: &str) -> bool {
        self.tokens.iter().any(|token| {
            let name = token.split('=').next().unwrap_or_default().trim_end();
            name.eq_ignore_ascii_case(directive)
        })
    }

    /// `no-store` is present.
    pub fn no_store(&self) -> bool {
        self.has(NO_STORE)
    }

    /// `no-cache` or `must-revalidate` is present.
    pub fn requires_revalidation(&self) -> bool {
        self.has(NO_CACHE) || self.has(MUST_REVALIDATE)
    }

    /// `max-age` in seconds, when a numeric value can be matched.
    pub fn max_age(&self) -> Option<u64> {
        MAX_AGE
            .captures(&self.raw)
            .and_then(|captures| captures.get(1))
            .and_then(|value| value.as_str().parse().ok())
    }

    /// The header value as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Freshness of a stored response at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Younger than its `max-age`.
    Fresh,
    /// Older than or exactly as old as its `max-age`.
    Stale,
    /// `Date` or `max-age` missing or unparsable.
    Indeterminate,
}

impl Freshness {
    /// Computes freshness as `(now - Date) < max-age`.
    pub fn of(record: &ResponseRecord, now: DateTime<Utc>) -> Self {
        let max_age = CacheControl::from_headers(record.headers()).and_then(|cc| cc.max_age());
        let date = record.headers().get(header::DATE).and_then(parse_http_date);

        match (date, max_age) {
            (Some(date), Some(max_age)) => {
                let age = now.signed_duration_since(date);
                let max_age = i64::try_from(max_age)
                    .ok()
                    .and_then(chrono::Duration::try_seconds)
                    .unwrap_or(chrono::Duration::MAX);
                if age < max_age {
                    Freshness::Fresh
                } else {
                    Freshness::Stale
                }
            }
            _ => Freshness::Indeterminate,
        }
    }

    /// Only [`Freshness::Fresh`] entries may be served without the network.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}

/// Entity tag of a response, if it has one.
pub fn etag(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(header::ETAG)
}

/// Parses an HTTP-date (`Sun, 06 Nov 1994 08:49:37 GMT` and the obsolete
/// RFC 850 / asctime forms).
pub fn parse_http_date(value: &HeaderValue) -> Option<DateTime<Utc>> {
    let text = value.to_str().ok()?;
    httpdate::parse_http_date(text.trim()).ok().map(DateTime::<Utc>::from)
}

/// Formats an instant as an IMF-fixdate header value.
pub fn http_date(instant: DateTime<Utc>) -> HeaderValue {
    let seconds = u64::try_from(instant.timestamp()).unwrap_or_default();
    let system = SystemTime::UNIX_EPOCH + Duration::from_secs(seconds);
    HeaderValue::from_str(&httpdate::fmt_http_date(system))
        .unwrap_or_else(|_| HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"))
}
