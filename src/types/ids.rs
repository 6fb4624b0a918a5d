//! Newtype wrappers for domain identifiers.
//!
//! These keep issue numbers, repository names and event types from being
//! mixed up with plain integers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An issue number within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(pub u64);

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error returned when a repository full name has no `/` separator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("repository full name {0:?} has no owner separator")]
pub struct MalformedRepoName(pub String);

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Splits a `full_name` such as `"dotnet/runtime"` on its first `/`.
    ///
    /// Anything after the first separator belongs to the repository name.
    pub fn parse_full_name(full_name: &str) -> Result<Self, MalformedRepoName> {
        full_name
            .split_once('/')
            .map(|(owner, repo)| RepoId::new(owner, repo))
            .ok_or_else(|| MalformedRepoName(full_name.to_string()))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// The value of the `X-GitHub-Event` header, e.g. `"issues"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(pub String);

impl EventType {
    pub fn new(s: impl Into<String>) -> Self {
        EventType(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
