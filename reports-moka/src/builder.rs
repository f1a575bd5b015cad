//! Builder for configuring [`MokaStore`].

use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;
use reports_backend::CachedResponse;
use reports_core::CacheKey;

use crate::backend::MokaStore;

/// Marker type: capacity has not been configured yet.
///
/// Call either [`max_entries()`](MokaStoreBuilder::max_entries) or
/// [`max_bytes()`](MokaStoreBuilder::max_bytes) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: the store holds at most `n` entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: the store uses at most `n` bytes (approximate).
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

/// Builder for a [`MokaStore`].
///
/// Capacity is mandatory and set exactly once, either as an entry count or as
/// an approximate byte budget. `build()` only exists once it is set.
///
/// ```
/// use reports_moka::{EvictionPolicy, MokaStore};
///
/// let store = MokaStore::builder()
///     .max_entries(500)
///     .eviction_policy(EvictionPolicy::lru())
///     .label("api")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct MokaStoreBuilder<Cap = NoCapacity> {
    capacity: Cap,
    label: String,
    eviction_policy: Option<EvictionPolicy>,
}

impl Default for MokaStoreBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaStoreBuilder<NoCapacity> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: "moka".to_owned(),
            eviction_policy: None,
        }
    }

    /// Limits the store to `n` entries.
    pub fn max_entries(self, n: u64) -> MokaStoreBuilder<EntryCapacity> {
        MokaStoreBuilder {
            capacity: EntryCapacity(n),
            label: self.label,
            eviction_policy: self.eviction_policy,
        }
    }

    /// Limits the store to approximately `n` bytes of keys, headers and bodies.
    pub fn max_bytes(self, n: u64) -> MokaStoreBuilder<ByteCapacity> {
        MokaStoreBuilder {
            capacity: ByteCapacity(n),
            label: self.label,
            eviction_policy: self.eviction_policy,
        }
    }
}

impl<Cap> MokaStoreBuilder<Cap> {
    /// Sets the label used in logs and metrics. Defaults to `"moka"`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Overrides the eviction policy.
    ///
    /// Defaults to TinyLFU for entry capacity and LRU for byte capacity.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }
}

impl MokaStoreBuilder<EntryCapacity> {
    /// Builds the store with entry-count capacity.
    pub fn build(self) -> MokaStore {
        let policy = self
            .eviction_policy
            .unwrap_or_else(EvictionPolicy::tiny_lfu);
        let cache: Cache<CacheKey, CachedResponse> = CacheBuilder::new(self.capacity.0)
            .eviction_policy(policy)
            .build();

        MokaStore {
            cache,
            label: self.label,
        }
    }
}

impl MokaStoreBuilder<ByteCapacity> {
    /// Builds the store with byte capacity.
    ///
    /// LRU is the default here: TinyLFU admission can reject a new entry even
    /// when evicting would make room for it.
    pub fn build(self) -> MokaStore {
        let policy = self.eviction_policy.unwrap_or_else(EvictionPolicy::lru);
        let cache: Cache<CacheKey, CachedResponse> = CacheBuilder::new(self.capacity.0)
            .weigher(byte_weigher)
            .eviction_policy(policy)
            .build();

        MokaStore {
            cache,
            label: self.label,
        }
    }
}

fn byte_weigher(key: &CacheKey, value: &CachedResponse) -> u32 {
    (key.memory_size() + value.memory_size()).min(u32::MAX as usize) as u32
}
