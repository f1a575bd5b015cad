use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use reports_backend::{BackendError, BackendResult, CacheStore, CachedResponse};
use reports_core::{CacheKey, ResponseRecord};

/// Operation counters shared by every clone of a [`MockStore`].
#[derive(Debug, Default)]
pub struct StoreCounters {
    /// Reads, hit or miss.
    pub read_count: AtomicUsize,
    /// Reads that found an entry.
    pub read_hit_count: AtomicUsize,
    /// Write attempts, failed ones included.
    pub write_count: AtomicUsize,
}

impl StoreCounters {
    /// Number of reads so far.
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Number of reads that found an entry.
    pub fn read_hit_count(&self) -> usize {
        self.read_hit_count.load(Ordering::SeqCst)
    }

    /// Number of write attempts.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Zeroes every counter.
    pub fn reset(&self) {
        self.read_count.store(0, Ordering::SeqCst);
        self.read_hit_count.store(0, Ordering::SeqCst);
        self.write_count.store(0, Ordering::SeqCst);
    }
}

/// Store backed by a `DashMap`, holding entries in their persisted form.
///
/// Entries round-trip through [`CachedResponse`] like in a real store, so a
/// decoded body or cache status never survives a write.
#[derive(Clone, Debug, Default)]
pub struct MockStore {
    pub entries: Arc<DashMap<CacheKey, CachedResponse>>,
    pub counters: Arc<StoreCounters>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entry without touching the counters.
    pub fn insert(&self, key: impl Into<CacheKey>, record: &ResponseRecord) {
        self.entries.insert(key.into(), CachedResponse::from(record));
    }

    /// Inspects an entry without touching the counters.
    pub fn get(&self, key: impl Into<CacheKey>) -> Option<ResponseRecord> {
        self.entries
            .get(&key.into())
            .map(|entry| ResponseRecord::from(entry.value().clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn read_count(&self) -> usize {
        self.counters.read_count()
    }

    pub fn write_count(&self) -> usize {
        self.counters.write_count()
    }

    /// Makes every subsequent read fail with a connection error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail with a connection error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

fn unavailable() -> BackendError {
    BackendError::ConnectionError("store unavailable".into())
}

#[async_trait]
impl CacheStore for MockStore {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>> {
        self.counters.read_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let found = self
            .entries
            .get(key)
            .map(|entry| ResponseRecord::from(entry.value().clone()));
        if found.is_some() {
            self.counters.read_hit_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }

    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()> {
        self.counters.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.entries.insert(key.clone(), CachedResponse::from(record));
        Ok(())
    }

    fn label(&self) -> &str {
        "mock"
    }
}
