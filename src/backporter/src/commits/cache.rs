//! Per-run pull request commit cache.

use crate::host::{CodeHost, CommitRecord, HostError, PullRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Commits listed on pull requests, fetched at most once per pull request.
///
/// Owned by a single run. Entries are never refreshed or evicted.
#[derive(Debug, Default)]
pub struct CommitCache {
    entries: HashMap<u64, Arc<[CommitRecord]>>,
}

impl CommitCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commits of `pr`, listing them on the first call only.
    ///
    /// # Errors
    ///
    /// Returns the code host error when the listing fails. Nothing is cached
    /// in that case.
    pub async fn pull_request_commits(
        &mut self,
        host: &dyn CodeHost,
        pr: &PullRequest,
    ) -> Result<Arc<[CommitRecord]>, HostError> {
        if let Some(commits) = self.entries.get(&pr.number) {
            return Ok(Arc::clone(commits));
        }

        let commits: Arc<[CommitRecord]> = host.list_pull_request_commits(pr).await?.into();
        debug!(pr = pr.number, count = commits.len(), "Cached pull request commits");
        self.entries.insert(pr.number, Arc::clone(&commits));
        Ok(commits)
    }

    /// Returns true if commits for pull request `number` are cached.
    #[must_use]
    pub fn contains(&self, number: u64) -> bool {
        self.entries.contains_key(&number)
    }
}
