use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::request::RequestContext;
use crate::response::ResponseRecord;

/// The terminal link of a pipeline: performs the actual network call.
///
/// Implementations turn a [`RequestContext`] into a [`ResponseRecord`] and
/// report client failures as [`Error::Transport`](crate::Error::Transport).
/// Timeouts and connection management belong to the implementation; the
/// pipeline never retries.
///
/// # Examples
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use reports_core::{RequestContext, ResponseRecord, Result, Transport};
///
/// struct Canned(ResponseRecord);
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn call(&self, _request: RequestContext) -> Result<ResponseRecord> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the call.
    async fn call(&self, request: RequestContext) -> Result<ResponseRecord>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn call(&self, request: RequestContext) -> Result<ResponseRecord> {
        (**self).call(request).await
    }
}

#[async_trait]
impl Transport for Box<dyn Transport> {
    async fn call(&self, request: RequestContext) -> Result<ResponseRecord> {
        (**self).call(request).await
    }
}
