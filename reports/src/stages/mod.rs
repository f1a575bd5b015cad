//! Concrete pipeline stages.
//!
//! The usual order for a REST API client, outermost first:
//!
//! 1. [`LoggingStage`] so the timing covers everything below it
//! 2. [`StatusCheckStage`]
//! 3. [`JsonDecodingStage`], so cache hits are decoded too
//! 4. [`CacheStage`], which answers `304`s before the status check sees them
//! 5. [`AuthenticationStage`], so credentials never reach the store

mod auth;
mod cache;
mod json;
mod logging;
mod status_check;

pub use auth::{AuthenticationStage, CredentialProvider, StaticToken};
pub use cache::CacheStage;
pub use json::JsonDecodingStage;
pub use logging::LoggingStage;
pub use status_check::{DEFAULT_ACCEPTED_STATUSES, StatusCheckStage};
