//! Redis cache store for the reports pipeline.
//!
//! Entries are encoded with a [`Format`](reports_backend::Format) and kept
//! under their URL key, optionally namespaced with a prefix. The store sets
//! no expiry on keys: stale entries must survive for revalidation.
mod backend;
pub mod error;

pub use backend::{RedisStore, RedisStoreBuilder};
pub use error::Error;
