//! Moka store implementation.

use async_trait::async_trait;
use moka::future::Cache;
use reports_backend::{BackendResult, CacheStore, CachedResponse};
use reports_core::{CacheKey, ResponseRecord};
use tracing::trace;

use crate::builder::{MokaStoreBuilder, NoCapacity};

/// In-memory cache store powered by Moka.
///
/// `MokaStore` keeps [`CachedResponse`] values in a concurrent, bounded
/// in-memory cache. Entries carry no time-to-live: a stale entry must stay
/// readable so the cache stage can revalidate it with its `ETag`. Entries
/// leave the store only when overwritten or evicted for capacity.
///
/// # Examples
///
/// ```
/// use reports_moka::MokaStore;
///
/// let store = MokaStore::builder()
///     .label("github")
///     .max_bytes(16 * 1024 * 1024)
///     .build();
/// ```
///
/// # Caveats
///
/// - Data is **not persisted**: the cache is lost on process restart
/// - Data is **not shared** across processes: use Redis for that
#[derive(Clone)]
pub struct MokaStore {
    /// The underlying Moka async cache instance.
    pub cache: Cache<CacheKey, CachedResponse>,
    /// Label identifying this store in logs and metrics.
    pub label: String,
}

impl std::fmt::Debug for MokaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStore")
            .field("label", &self.label)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MokaStore {
    /// Creates a new builder. Capacity must be configured before `build()`.
    pub fn builder() -> MokaStoreBuilder<NoCapacity> {
        MokaStoreBuilder::new()
    }

    /// Access to the underlying cache, e.g. to run pending maintenance tasks.
    pub fn cache(&self) -> &Cache<CacheKey, CachedResponse> {
        &self.cache
    }
}

#[async_trait]
impl CacheStore for MokaStore {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>> {
        let value = self.cache.get(key).await;
        trace!(%key, found = value.is_some(), store = %self.label, "moka read");
        Ok(value.map(ResponseRecord::from))
    }

    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()> {
        self.cache
            .insert(key.clone(), CachedResponse::from(record))
            .await;
        trace!(%key, store = %self.label, "moka write");
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
