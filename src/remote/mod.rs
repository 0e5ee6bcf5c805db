//! Read-only queries against the remote issue tracker.
//!
//! The coordinator only depends on [`IssueApi`]; [`github::GitHubApi`] is the
//! production implementation.

pub mod error;
pub mod github;

use std::future::Future;

use crate::error::Result;
use crate::types::{Release, SearchResult};

pub use github::GitHubApi;

/// Common interface for the issue tracker
pub trait IssueApi: Send + Sync + 'static {
    /// List releases of the configured repository, in the order the remote
    /// returns them (newest first).
    fn list_releases(&self) -> impl Future<Output = Result<Vec<Release>>> + Send;

    /// Search issues of the configured repository for a keyword.
    fn search_issues(&self, keyword: &str)
    -> impl Future<Output = Result<Vec<SearchResult>>> + Send;
}
