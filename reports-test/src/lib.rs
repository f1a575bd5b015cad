//! Test doubles shared by the workspace's test suites.
//!
//! - [`MockTransport`]: replays scripted responses and records requests
//! - [`MockStore`]: in-memory store with counters and failure injection
//! - [`ManualClock`]: a clock that only moves when told to
//! - [`tracing`]: capture of emitted events for log assertions

pub mod clock;
pub mod mock_store;
pub mod mock_transport;
pub mod tracing;

pub use clock::ManualClock;
pub use mock_store::{MockStore, StoreCounters};
pub use mock_transport::MockTransport;
