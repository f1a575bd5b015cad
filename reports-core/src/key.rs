//! Cache keys.
//!
//! A key is the absolute URL of a GET request exactly as the caller wrote
//! it, query string included. Two requests share an entry only when their
//! URLs are the same string; no normalization is applied.
//!
//! ```
//! use reports_core::{CacheKey, RequestContext};
//!
//! let request = RequestContext::get("https://api.github.com/users/octocat/repos?page=2").unwrap();
//! let key = CacheKey::from_request(&request);
//! assert_eq!(key.as_str(), "https://api.github.com/users/octocat/repos?page=2");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::request::RequestContext;

/// Identifier of a stored response.
///
/// `CacheKey` wraps its string in [`Arc`], so cloning only bumps a reference
/// count.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    inner: Arc<str>,
}

impl CacheKey {
    /// Creates a key from an already canonical URL string.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self {
            inner: Arc::from(key.as_ref()),
        }
    }

    /// Derives the key of a request from its URL string.
    pub fn from_request(request: &RequestContext) -> Self {
        Self::new(request.target())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Estimated heap footprint in bytes.
    pub fn memory_size(&self) -> usize {
        2 * std::mem::size_of::<usize>() + self.inner.len()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        CacheKey::new(key)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        CacheKey::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_is_part_of_the_key() {
        let first = RequestContext::get("https://example.test/repos?page=1").unwrap();
        let second = RequestContext::get("https://example.test/repos?page=2").unwrap();

        assert_ne!(CacheKey::from_request(&first), CacheKey::from_request(&second));
    }

    #[test]
    fn test_url_is_not_normalized() {
        let bare = RequestContext::get("https://api.github.com").unwrap();
        let slashed = RequestContext::get("https://api.github.com/").unwrap();

        assert_eq!(CacheKey::from_request(&bare).as_str(), "https://api.github.com");
        assert_ne!(CacheKey::from_request(&bare), CacheKey::from_request(&slashed));
    }

    #[test]
    fn test_exact_string_match_only() {
        let lower = RequestContext::get("https://example.test/repos?a=1&b=2").unwrap();
        let reordered = RequestContext::get("https://example.test/repos?b=2&a=1").unwrap();

        assert_ne!(
            CacheKey::from_request(&lower),
            CacheKey::from_request(&reordered)
        );
    }
}
