//! In-memory cache store for the reports pipeline, powered by
//! [Moka](https://github.com/moka-rs/moka).
//!
//! ```
//! use reports_moka::MokaStore;
//!
//! let store = MokaStore::builder().max_entries(1_000).build();
//! ```
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod builder;

pub use backend::MokaStore;
pub use builder::{ByteCapacity, EntryCapacity, MokaStoreBuilder, NoCapacity};
pub use moka::policy::EvictionPolicy;
