#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Pipeline assembly.
///
/// [`Pipeline`] owns an ordered list of stages plus the terminal transport
/// and runs each request through them outermost first.
pub mod pipeline;

/// Metrics collection for cache and request observability.
///
/// When the `metrics` feature is enabled, this module provides counters
/// and histograms for:
/// - Cache hits, misses and revalidations per store
/// - Store read and write failures
/// - Request duration per method and status
pub mod metrics;

/// The stages shipped with the pipeline.
pub mod stages;

pub use pipeline::{Pipeline, PipelineBuilder};

pub use reports_core::{
    CacheKey, CacheStatus, Clock, Error, Next, RequestContext, ResponseRecord, Result, Stage,
    SystemClock, Transport,
};

/// The `reports` prelude.
///
/// ```rust
/// use reports::prelude::*;
/// ```
pub mod prelude {
    pub use crate::stages::{
        AuthenticationStage, CacheStage, JsonDecodingStage, LoggingStage, StaticToken,
        StatusCheckStage,
    };
    pub use crate::{Pipeline, RequestContext, ResponseRecord, Stage, Transport};
}
