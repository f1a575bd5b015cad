//! Outbound request description.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};

use crate::error::{Error, Result};

/// Methods a [`RequestContext`] may carry.
const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// A single outbound call as seen by the pipeline.
///
/// The context is built by the caller and handed to the first stage. From then
/// on only stages change it, and only its headers and body.
///
/// # Example
///
/// ```
/// use http::Method;
/// use reports_core::RequestContext;
///
/// let request = RequestContext::new(Method::GET, "https://api.github.com/users/octocat")
///     .unwrap()
///     .with_header(http::header::ACCEPT, "application/vnd.github.v3+json")
///     .unwrap();
///
/// assert_eq!(request.target(), "https://api.github.com/users/octocat");
/// assert!(request.is_get());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    target: Arc<str>,
    url: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestContext {
    /// Creates a request for an absolute URL.
    ///
    /// Fails when the method is outside GET/POST/PUT/DELETE/PATCH or the URL
    /// lacks a scheme or authority. The URL string is kept exactly as given.
    pub fn new<U>(method: Method, url: U) -> Result<Self>
    where
        U: Into<String>,
    {
        if !SUPPORTED_METHODS.contains(&method) {
            return Err(Error::InvalidRequest(format!("unsupported method {method}")));
        }
        let target: Arc<str> = Arc::from(url.into());
        let url = Uri::try_from(&*target)
            .map_err(|e| Error::InvalidRequest(format!("invalid url: {e}")))?;
        if url.scheme().is_none() || url.authority().is_none() {
            return Err(Error::InvalidRequest(format!("url {target} is not absolute")));
        }
        Ok(Self {
            method,
            target,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Shorthand for a GET request.
    pub fn get<U>(url: U) -> Result<Self>
    where
        U: Into<String>,
    {
        Self::new(Method::GET, url)
    }

    /// Adds a header, replacing any previous value with the same name.
    pub fn with_header<K, V>(mut self, name: K, value: V) -> Result<Self>
    where
        K: TryInto<HeaderName>,
        K::Error: std::fmt::Display,
        V: TryInto<HeaderValue>,
        V::Error: std::fmt::Display,
    {
        let name = name
            .try_into()
            .map_err(|e| Error::InvalidRequest(format!("invalid header name: {e}")))?;
        let value = value
            .try_into()
            .map_err(|e| Error::InvalidRequest(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body and the matching `Content-Type`.
    pub fn with_json(mut self, value: &serde_json::Value) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(Bytes::from(body));
        Ok(self)
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Whether this is a GET request.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Absolute target URL, parsed.
    pub fn url(&self) -> &Uri {
        &self.url
    }

    /// The URL string exactly as the caller wrote it.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers, for stages that attach credentials or
    /// conditional headers before forwarding.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Mutable access to the body.
    pub fn body_mut(&mut self) -> &mut Option<Bytes> {
        &mut self.body
    }

    /// Splits the context into its parts, for transports.
    pub fn into_parts(self) -> (Method, Uri, HeaderMap, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative_url() {
        let result = RequestContext::get("/users/octocat");
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_rejects_unsupported_method() {
        let result = RequestContext::new(Method::OPTIONS, "https://example.test/");
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_target_keeps_the_callers_string() {
        let request = RequestContext::get("https://api.github.com").unwrap();

        assert_eq!(request.target(), "https://api.github.com");
        assert_eq!(request.url().to_string(), "https://api.github.com/");
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let request = RequestContext::get("https://example.test/")
            .unwrap()
            .with_header("X-Token", "one")
            .unwrap()
            .with_header("x-token", "two")
            .unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers()["X-TOKEN"], "two");
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = RequestContext::new(Method::POST, "https://example.test/gists")
            .unwrap()
            .with_json(&serde_json::json!({"public": false}))
            .unwrap();

        assert_eq!(
            request.headers()[http::header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(request.body().unwrap().as_ref(), br#"{"public":false}"#);
    }
}
