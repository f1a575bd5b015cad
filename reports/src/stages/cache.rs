use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use http::header::{DATE, IF_NONE_MATCH};
use reports_backend::CacheStore;
use reports_core::headers::{self, CacheControl, Freshness};
use reports_core::{
    CacheKey, CacheStatus, Clock, Next, RequestContext, ResponseRecord, Result, Stage,
    SystemClock,
};
use tracing::{debug, trace, warn};

use crate::metrics;

/// Response cache with conditional revalidation.
///
/// Only GET requests are cached, keyed by their absolute URL. For each GET:
///
/// - a stored entry that is fresh (`now - Date < max-age`) and carries
///   neither `no-cache` nor `must-revalidate` is returned without a network
///   call
/// - any other stored entry is revalidated: the request gains
///   `If-None-Match` when the entry has an `ETag`, otherwise it is refetched
///   unconditionally
/// - a `304 Not Modified` answer refreshes the stored entry's `Date`, writes
///   it back and returns it in place of the `304`
/// - a live response is written when it has a `Cache-Control` header
///   without `no-store`, replacing any previous entry
///
/// Store failures never fail a request: a failed read counts as a miss and a
/// failed write is logged. Errors from deeper stages and the transport pass
/// through untouched.
///
/// Returned records carry a [`CacheStatus`].
pub struct CacheStage<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> CacheStage<S>
where
    S: CacheStore + 'static,
{
    /// Creates a cache stage over `store`, using the system clock.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }
}

impl<S> CacheStage<S>
where
    S: CacheStore + ?Sized + 'static,
{
    /// Creates a cache stage over a shared store.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for freshness decisions.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn lookup(&self, key: &CacheKey) -> Option<ResponseRecord> {
        match self.store.read(key).await {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%key, store = self.store.label(), %error, "cache read failed");
                metrics::record_store_error(self.store.label(), "read");
                None
            }
        }
    }

    async fn store_entry(&self, key: &CacheKey, record: &ResponseRecord) {
        match self.store.write(key, record).await {
            Ok(()) => trace!(%key, store = self.store.label(), "stored response"),
            Err(error) => {
                warn!(%key, store = self.store.label(), %error, "cache write failed");
                metrics::record_store_error(self.store.label(), "write");
            }
        }
    }

    fn finish(&self, mut record: ResponseRecord, status: CacheStatus) -> ResponseRecord {
        metrics::record_cache_status(status, self.store.label());
        record.set_cache_status(status);
        record
    }
}

/// A live response may be stored when it has `Cache-Control` without
/// `no-store`.
fn is_storable(response: &ResponseRecord) -> bool {
    CacheControl::from_headers(response.headers()).is_some_and(|cc| !cc.no_store())
}

#[async_trait]
impl<S> Stage for CacheStage<S>
where
    S: CacheStore + ?Sized + 'static,
{
    async fn handle(&self, mut request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        if !request.is_get() {
            return next.run(request).await;
        }

        let key = CacheKey::from_request(&request);
        let entry = self.lookup(&key).await;

        if let Some(entry) = &entry {
            let freshness = Freshness::of(entry, self.clock.now());
            let revalidate = CacheControl::from_headers(entry.headers())
                .is_some_and(|cc| cc.requires_revalidation());

            if freshness.is_fresh() && !revalidate {
                debug!(%key, "cache hit");
                return Ok(self.finish(entry.clone(), CacheStatus::Hit));
            }

            match headers::etag(entry.headers()) {
                Some(etag) => {
                    debug!(%key, ?freshness, revalidate, "revalidating stored entry");
                    request.headers_mut().insert(IF_NONE_MATCH, etag.clone());
                }
                None => debug!(%key, ?freshness, revalidate, "stored entry has no etag, refetching"),
            }
        } else {
            debug!(%key, "cache miss");
        }

        let response = next.run(request).await?;

        match entry {
            Some(mut entry) if response.status() == StatusCode::NOT_MODIFIED => {
                let date = response
                    .headers()
                    .get(DATE)
                    .cloned()
                    .unwrap_or_else(|| headers::http_date(self.clock.now()));
                entry.headers_mut().insert(DATE, date);
                self.store_entry(&key, &entry).await;
                Ok(self.finish(entry, CacheStatus::Revalidated))
            }
            _ => {
                if response.status() != StatusCode::NOT_MODIFIED && is_storable(&response) {
                    self.store_entry(&key, &response).await;
                } else {
                    trace!(%key, status = %response.status(), "response not stored");
                }
                Ok(self.finish(response, CacheStatus::Miss))
            }
        }
    }

    fn name(&self) -> &'static str {
        "cache"
    }
}
