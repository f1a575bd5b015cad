#![warn(missing_docs)]
//! # reports-core
//!
//! Core traits and types for the reports HTTP middleware pipeline.
//!
//! This crate provides the vocabulary shared by every other crate in the
//! workspace: the request and response types that flow through a pipeline,
//! the [`Stage`] trait that pipeline stages implement, and the [`Transport`]
//! trait for the terminal network call.
//!
//! ## Architecture
//!
//! A pipeline is an onion of stages wrapped around a transport:
//!
//! - **Describe** an outbound call ([`RequestContext`])
//! - **Carry** the result back through the stages ([`ResponseRecord`])
//! - **Wrap** the call with cross-cutting behaviour ([`Stage`], [`Next`])
//! - **Perform** the network call ([`Transport`])
//! - **Reason** about HTTP caching metadata ([`headers`])
//! - **Tell time** in a testable way ([`Clock`])
//!
//! The chain builder and concrete stages live in the `reports` crate; storage
//! backends live in `reports-backend` and its implementations.

pub mod clock;
pub mod error;
pub mod headers;
pub mod key;
pub mod request;
pub mod response;
pub mod stage;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use error::{BoxError, Error, Result};
pub use headers::{CacheControl, Freshness};
pub use key::CacheKey;
pub use request::RequestContext;
pub use response::{CacheStatus, ResponseRecord};
pub use stage::{Next, Stage};
pub use transport::Transport;

/// Raw body bytes. `Bytes` keeps clones cheap as records move between stages
/// and the cache store.
pub type Raw = bytes::Bytes;
