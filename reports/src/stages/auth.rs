use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderValue;
use http::header::AUTHORIZATION;
use reports_core::{Error, Next, RequestContext, ResponseRecord, Result, Stage};

/// Source of the `Authorization` header value.
///
/// Providers hand out a ready header value; obtaining or rotating the
/// underlying credential is up to the implementation.
pub trait CredentialProvider: Send + Sync {
    /// The header value to attach, or `None` to send the request anonymously.
    fn authorization(&self) -> Option<HeaderValue>;
}

impl<P> CredentialProvider for Arc<P>
where
    P: CredentialProvider + ?Sized,
{
    fn authorization(&self) -> Option<HeaderValue> {
        (**self).authorization()
    }
}

impl<P> CredentialProvider for Option<P>
where
    P: CredentialProvider,
{
    fn authorization(&self) -> Option<HeaderValue> {
        self.as_ref().and_then(P::authorization)
    }
}

/// A fixed token, sent as `Authorization: token <token>`.
#[derive(Clone)]
pub struct StaticToken {
    value: HeaderValue,
}

impl StaticToken {
    /// GitHub style `token <token>` credentials.
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        Self::with_scheme("token", token)
    }

    /// `Bearer <token>` credentials.
    pub fn bearer(token: impl AsRef<str>) -> Result<Self> {
        Self::with_scheme("Bearer", token)
    }

    fn with_scheme(scheme: &str, token: impl AsRef<str>) -> Result<Self> {
        let mut value = HeaderValue::try_from(format!("{scheme} {}", token.as_ref()))
            .map_err(|_| Error::InvalidRequest("token contains invalid header characters".into()))?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

impl CredentialProvider for StaticToken {
    fn authorization(&self) -> Option<HeaderValue> {
        Some(self.value.clone())
    }
}

/// Attaches credentials to requests that carry no `Authorization` header.
///
/// An `Authorization` header set by the caller is left as is.
pub struct AuthenticationStage<P> {
    provider: P,
}

impl<P> AuthenticationStage<P>
where
    P: CredentialProvider,
{
    /// Creates the stage around a credential provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> Stage for AuthenticationStage<P>
where
    P: CredentialProvider + 'static,
{
    async fn handle(&self, mut request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        if !request.headers().contains_key(AUTHORIZATION)
            && let Some(value) = self.provider.authorization()
        {
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        next.run(request).await
    }

    fn name(&self) -> &'static str {
        "authentication"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_uses_token_scheme() {
        let token = StaticToken::new("abc").unwrap();
        let value = token.authorization().unwrap();
        assert_eq!(value, "token abc");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_scheme() {
        let token = StaticToken::bearer("abc").unwrap();
        assert_eq!(token.authorization().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        assert!(matches!(
            StaticToken::new("abc\ndef"),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_missing_token_is_anonymous() {
        let provider: Option<StaticToken> = None;
        assert!(provider.authorization().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let token = StaticToken::new("secret").unwrap();
        assert!(!format!("{token:?}").contains("secret"));
    }
}
