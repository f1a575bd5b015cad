//! Read/write and eviction behavior of the Moka store.

use http::StatusCode;
use http::header::{CACHE_CONTROL, ETAG};
use reports_backend::{CacheStore, CachedResponse};
use reports_core::{CacheKey, ResponseRecord};
use reports_moka::{EvictionPolicy, MokaStore, MokaStoreBuilder};

fn key(id: u32) -> CacheKey {
    CacheKey::new(format!("https://api.github.com/users/u{id}"))
}

fn record(size: usize) -> ResponseRecord {
    ResponseRecord::new(StatusCode::OK)
        .with_header(CACHE_CONTROL, "max-age=60")
        .with_body(vec![b'x'; size])
}

#[tokio::test]
async fn test_read_missing_key_is_none() {
    let store = MokaStore::builder().max_entries(10).build();
    assert!(store.read(&key(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_write_then_read_returns_same_record() {
    let store = MokaStore::builder().max_entries(10).label("github").build();
    let stored = record(32).with_header(ETAG, "\"abc123\"");

    store.write(&key(1), &stored).await.unwrap();

    let read = store.read(&key(1)).await.unwrap().expect("entry present");
    assert_eq!(read, stored);
    assert!(read.decoded().is_none());
    assert_eq!(store.label(), "github");
}

#[tokio::test]
async fn test_write_replaces_previous_entry() {
    let store = MokaStore::builder().max_entries(10).build();
    store.write(&key(1), &record(8)).await.unwrap();
    store.write(&key(1), &record(16)).await.unwrap();

    let read = store.read(&key(1)).await.unwrap().unwrap();
    assert_eq!(read.body().len(), 16);
}

#[tokio::test]
async fn test_max_bytes_evicts_down_to_capacity() {
    let single = key(1).memory_size() + CachedResponse::from(&record(100)).memory_size();
    let store = MokaStoreBuilder::default()
        .max_bytes((single * 3) as u64)
        .build();

    for i in 1..=3 {
        store.write(&key(i), &record(100)).await.unwrap();
    }
    store.cache().run_pending_tasks().await;

    for i in 1..=3 {
        assert!(
            store.read(&key(i)).await.unwrap().is_some(),
            "entry {i} should fit"
        );
    }

    store.write(&key(4), &record(100)).await.unwrap();
    store.cache().run_pending_tasks().await;

    let mut count = 0;
    for i in 1..=4 {
        if store.read(&key(i)).await.unwrap().is_some() {
            count += 1;
        }
    }
    assert_eq!(count, 3, "should hold exactly 3 entries after eviction");
}

#[tokio::test]
async fn test_max_entries_with_lru_policy() {
    let store = MokaStore::builder()
        .max_entries(2)
        .eviction_policy(EvictionPolicy::lru())
        .build();

    for i in 1..=3 {
        store.write(&key(i), &record(4)).await.unwrap();
        store.cache().run_pending_tasks().await;
    }

    assert!(store.read(&key(1)).await.unwrap().is_none());
    assert!(store.read(&key(3)).await.unwrap().is_some());
    assert_eq!(store.cache().entry_count(), 2);
}
