//! Resources returned by the GitHub API, reduced to the fields reports use.

use serde::{Deserialize, Serialize};

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
}

/// A repository as listed by `/users/{user}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub html_url: String,
}

/// A public event, e.g. a push or a star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEvent")]
pub struct Event {
    /// Event type such as `PushEvent` or `WatchEvent`.
    pub kind: String,
    /// `owner/name` of the repository the event happened in.
    pub repo_name: String,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    repo: RepoRef,
}

#[derive(Deserialize)]
struct RepoRef {
    name: String,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        Event {
            kind: raw.kind,
            repo_name: raw.repo.name,
        }
    }
}

/// A created gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gist {
    pub html_url: String,
}
