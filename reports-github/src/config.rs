//! Client configuration.
//!
//! Configuration comes from a YAML file:
//!
//! ```yaml
//! api_url: https://api.github.com
//! token: ghp_xxx
//! timeout: 10s
//! cache:
//!   type: Redis
//!   url: redis://127.0.0.1/
//!   prefix: reports
//! ```
//!
//! or from the environment (after loading `.env`):
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `GITHUB_TOKEN` | API token |
//! | `REPORTS_API_URL` | API base URL |
//! | `REPORTS_CACHE` | `memory`, `redis` or `none` |
//! | `REPORTS_REDIS_URL` | Redis URL when `REPORTS_CACHE=redis` |
//! | `REPORTS_TIMEOUT` | request timeout, e.g. `10s` |

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use humantime_serde::re::humantime;
use reports_backend::CacheStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default capacity of the in-memory cache.
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;

/// Errors raised while loading configuration or building its resources.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },

    #[error("cache backend {0} is not available in this build")]
    BackendNotAvailable(String),

    #[error("failed to create cache store: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),
}

/// Where responses are cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CacheBackend {
    /// In-process Moka cache.
    Memory {
        #[serde(default = "default_max_entries")]
        max_entries: u64,
    },
    /// Shared Redis cache.
    Redis {
        url: String,
        #[serde(default)]
        prefix: Option<String>,
    },
    /// No caching.
    Disabled,
}

fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheBackend {
    fn default() -> Self {
        CacheBackend::Memory {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheBackend {
    /// Creates the configured store, or `None` when caching is disabled.
    pub fn into_store(self) -> Result<Option<Arc<dyn CacheStore>>, ConfigError> {
        match self {
            CacheBackend::Disabled => Ok(None),
            #[cfg(feature = "moka")]
            CacheBackend::Memory { max_entries } => {
                let store = reports_moka::MokaStore::builder()
                    .max_entries(max_entries)
                    .label("memory")
                    .build();
                Ok(Some(Arc::new(store)))
            }
            #[cfg(not(feature = "moka"))]
            CacheBackend::Memory { .. } => {
                Err(ConfigError::BackendNotAvailable("Memory".to_string()))
            }
            #[cfg(feature = "redis")]
            CacheBackend::Redis { url, prefix } => {
                let mut builder = reports_redis::RedisStore::builder().server(url);
                if let Some(prefix) = prefix {
                    builder = builder.prefix(prefix);
                }
                let store = builder
                    .build()
                    .map_err(|e| ConfigError::Store(Box::new(e)))?;
                Ok(Some(Arc::new(store)))
            }
            #[cfg(not(feature = "redis"))]
            CacheBackend::Redis { .. } => {
                Err(ConfigError::BackendNotAvailable("Redis".to_string()))
            }
        }
    }
}

/// Settings of a [`GitHubClient`](crate::GitHubClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the API, without trailing slash.
    pub api_url: String,
    /// Token sent as `Authorization: token <token>`.
    pub token: Option<String>,
    pub user_agent: String,
    /// Total timeout of one HTTP request.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub cache: CacheBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: None,
            user_agent: concat!("reports/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(30),
            cache: CacheBackend::default(),
        }
    }
}

impl Config {
    /// Parses YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.apply_lookup(&lookup)?;
        Ok(config)
    }

    /// Overrides fields with the variables `lookup` knows about.
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(token) = lookup("GITHUB_TOKEN") {
            self.token = Some(token);
        }
        if let Some(url) = lookup("REPORTS_API_URL") {
            self.api_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(timeout) = lookup("REPORTS_TIMEOUT") {
            self.timeout =
                humantime::parse_duration(&timeout).map_err(|e| ConfigError::InvalidValue {
                    var: "REPORTS_TIMEOUT",
                    message: e.to_string(),
                })?;
        }
        if let Some(cache) = lookup("REPORTS_CACHE") {
            self.cache = match cache.to_ascii_lowercase().as_str() {
                "memory" => CacheBackend::default(),
                "redis" => CacheBackend::Redis {
                    url: lookup("REPORTS_REDIS_URL")
                        .unwrap_or_else(|| "redis://127.0.0.1/".to_owned()),
                    prefix: Some("reports".to_owned()),
                },
                "none" | "disabled" | "off" => CacheBackend::Disabled,
                other => {
                    return Err(ConfigError::InvalidValue {
                        var: "REPORTS_CACHE",
                        message: format!("expected memory, redis or none, got {other:?}"),
                    });
                }
            };
        }
        Ok(())
    }
}
