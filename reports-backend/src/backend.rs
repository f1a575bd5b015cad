use std::sync::Arc;

use async_trait::async_trait;
use reports_core::{CacheKey, ResponseRecord};

use crate::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;

/// Key/value store of cached responses.
///
/// Stores only persist and return entries; freshness, revalidation and the
/// write policy are decided by the cache stage. A store may be in-process or
/// networked, the cache stage cannot tell the difference.
///
/// Concurrent writers to the same key race; the last write wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the entry stored under `key`, if any.
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>>;

    /// Stores `record` under `key`, replacing any previous entry.
    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()>;

    /// Returns the label of this store, used in logs and metrics.
    fn label(&self) -> &str {
        "store"
    }
}

#[async_trait]
impl CacheStore for &dyn CacheStore {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>> {
        (*self).read(key).await
    }

    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()> {
        (*self).write(key, record).await
    }

    fn label(&self) -> &str {
        (*self).label()
    }
}

#[async_trait]
impl CacheStore for Box<dyn CacheStore> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()> {
        (**self).write(key, record).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

#[async_trait]
impl CacheStore for Arc<dyn CacheStore> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()> {
        (**self).write(key, record).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
