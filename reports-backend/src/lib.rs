// #![warn(missing_docs)]
//! Traits and structs for cache store interaction.
//!
//! If you want to implement your own store, you are in the right place:
//! implement [`CacheStore`] and hand it to the cache stage.
mod backend;
mod error;
pub mod format;
mod value;

pub use backend::{BackendResult, CacheStore};
pub use error::BackendError;
pub use format::{Format, FormatError, JsonFormat};
pub use value::CachedResponse;
