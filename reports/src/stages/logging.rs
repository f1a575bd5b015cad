use std::time::Instant;

use async_trait::async_trait;
use reports_core::{Next, RequestContext, ResponseRecord, Result, Stage};
use tracing::Level;

use crate::metrics;

macro_rules! event_at {
    ($level:expr, $($args:tt)+) => {
        match $level {
            Level::TRACE => tracing::trace!($($args)+),
            Level::DEBUG => tracing::debug!($($args)+),
            Level::INFO => tracing::info!($($args)+),
            Level::WARN => tracing::warn!($($args)+),
            _ => tracing::error!($($args)+),
        }
    };
}

/// Logs one line per request once its response is back:
///
/// ```text
/// -> https://api.github.com/users/octocat GET 200 (0.153 s)
/// ```
///
/// The event also carries `url`, `method`, `status`, `duration` and `cache`
/// fields. Failed requests are logged with their error and passed on.
#[derive(Debug, Clone)]
pub struct LoggingStage {
    level: Level,
}

impl LoggingStage {
    /// Logs at `level`.
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// The level events are emitted at.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LoggingStage {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl Stage for LoggingStage {
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        let url = request.target().to_owned();
        let method = request.method().clone();
        let started = Instant::now();

        let result = next.run(request).await;
        let duration = started.elapsed();
        let secs = duration.as_secs_f64();

        match &result {
            Ok(response) => {
                let status = response.status().as_u16();
                let cache = response.cache_status().map_or("none", |status| status.as_str());
                event_at!(
                    self.level,
                    url = %url,
                    method = %method,
                    status,
                    duration = secs,
                    cache,
                    "-> {url} {method} {status} ({secs:.3} s)"
                );
                metrics::record_request_duration(method.as_str(), Some(status), duration);
            }
            Err(error) => {
                event_at!(
                    self.level,
                    url = %url,
                    method = %method,
                    duration = secs,
                    error = %error,
                    "-> {url} {method} failed ({secs:.3} s)"
                );
                metrics::record_request_duration(method.as_str(), None, duration);
            }
        }

        result
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}
