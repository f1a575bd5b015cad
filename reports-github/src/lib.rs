//! GitHub REST API client built on the reports pipeline.
//!
//! [`GitHubClient`] sends every call through
//! `Logging → StatusCheck → JsonDecoding → Cache → Authentication → reqwest`,
//! so repeated lookups are answered from the cache or revalidated with
//! `If-None-Match` instead of being refetched.
//!
//! ```no_run
//! use reports_github::{Config, GitHubClient};
//!
//! # async fn run() -> Result<(), reports_github::Error> {
//! let client = GitHubClient::new(&Config::from_env()?)?;
//! let user = client.user_info("octocat").await?;
//! println!("{} has {} public repos", user.name.unwrap_or_default(), user.public_repos);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod models;
pub mod report;

pub use client::GitHubClient;
pub use config::{CacheBackend, Config, ConfigError};
pub use error::{Error, Result};
pub use models::{Event, Gist, Repository, User};
