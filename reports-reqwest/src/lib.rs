//! [reqwest] transport for the reports pipeline.
//!
//! [`ReqwestTransport`] is the terminal link of a
//! [`Pipeline`](https://docs.rs/reports): it turns a
//! [`RequestContext`](reports_core::RequestContext) into a reqwest request,
//! performs it, and buffers the whole response into a
//! [`ResponseRecord`](reports_core::ResponseRecord).
//!
//! ```no_run
//! use std::time::Duration;
//! use reports_reqwest::ReqwestTransport;
//!
//! # fn main() -> Result<(), reports_core::Error> {
//! let transport = ReqwestTransport::builder()
//!     .user_agent("reports/0.1")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! The transport does not retry and owns the only timeout in the pipeline.

mod transport;

pub use transport::{ReqwestTransport, ReqwestTransportBuilder};
