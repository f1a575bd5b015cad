//! Metrics declaration and recording helpers.

use std::time::Duration;

use reports_core::CacheStatus;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of responses served from a store.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "reports_cache_hit_total",
            "Total number of responses served from the cache without a network call."
        );
        "reports_cache_hit_total"
    };
    /// Track number of responses fetched from the network.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "reports_cache_miss_total",
            "Total number of GET responses fetched from the network."
        );
        "reports_cache_miss_total"
    };
    /// Track number of stored entries confirmed by a 304.
    pub static ref CACHE_REVALIDATED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "reports_cache_revalidated_total",
            "Total number of stored entries revalidated with 304 Not Modified."
        );
        "reports_cache_revalidated_total"
    };
    /// Track store read and write failures.
    pub static ref CACHE_STORE_ERRORS: &'static str = {
        metrics::describe_counter!(
            "reports_store_errors_total",
            "Total number of failed cache store operations."
        );
        "reports_store_errors_total"
    };
    /// Histogram of request duration as seen by the logging stage.
    pub static ref REQUEST_DURATION: &'static str = {
        metrics::describe_histogram!(
            "reports_request_duration_seconds",
            metrics::Unit::Seconds,
            "Duration of pipeline requests in seconds."
        );
        "reports_request_duration_seconds"
    };
}

/// Records how the cache stage produced a response.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_cache_status(status: CacheStatus, store: &str) {
    let counter = match status {
        CacheStatus::Hit => *CACHE_HIT_COUNTER,
        CacheStatus::Miss => *CACHE_MISS_COUNTER,
        CacheStatus::Revalidated => *CACHE_REVALIDATED_COUNTER,
    };
    metrics::counter!(counter, "store" => store.to_string()).increment(1);
}

/// Records a failed store operation (`"read"` or `"write"`).
#[cfg(feature = "metrics")]
#[inline]
pub fn record_store_error(store: &str, operation: &'static str) {
    metrics::counter!(
        *CACHE_STORE_ERRORS,
        "store" => store.to_string(),
        "operation" => operation
    )
    .increment(1);
}

/// Records the duration of one request.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_request_duration(method: &str, status: Option<u16>, duration: Duration) {
    let status = status.map_or_else(|| "error".to_string(), |status| status.to_string());
    metrics::histogram!(
        *REQUEST_DURATION,
        "method" => method.to_string(),
        "status" => status
    )
    .record(duration.as_secs_f64());
}

/// No-op version when the metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_cache_status(_status: CacheStatus, _store: &str) {}

/// No-op version when the metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_store_error(_store: &str, _operation: &'static str) {}

/// No-op version when the metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_request_duration(_method: &str, _status: Option<u16>, _duration: Duration) {}
