//! Code host abstraction.
//!
//! The backport engine talks to the repository host exclusively through the
//! [`CodeHost`] trait. [`GitHubHost`] is the production implementation;
//! [`FakeHost`] keeps everything in memory for tests.

mod error;
mod fake;
mod github;
mod models;

pub use error::{ErrorKind, HostError};
pub use fake::{FakeHost, FakePullRequest};
pub use github::GitHubHost;
pub use models::{
    trim_ref_prefix, BranchRef, CommitFile, CommitRecord, CreatedPullRequest, NewCommit,
    NewPullRequest, PullRequest, Signature,
};

use async_trait::async_trait;

/// Read and write operations the backport engine needs from a repository host.
///
/// Every implementation is bound to a single repository. Operations are
/// attempted once; callers decide what a failure means by looking at
/// [`HostError::kind`].
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Fetches a pull request by number.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, HostError>;

    /// Lists all commits of a pull request, oldest first.
    async fn list_pull_request_commits(
        &self,
        pr: &PullRequest,
    ) -> Result<Vec<CommitRecord>, HostError>;

    /// Lists all files changed by a pull request, in host order.
    async fn list_pull_request_files(&self, pr: &PullRequest)
        -> Result<Vec<CommitFile>, HostError>;

    /// Lists up to `count` commits reachable from `sha`, newest first.
    async fn list_commits_from(
        &self,
        sha: &str,
        count: usize,
    ) -> Result<Vec<CommitRecord>, HostError>;

    /// Fetches a single commit, including its changed files.
    async fn get_commit(&self, sha: &str) -> Result<CommitRecord, HostError>;

    /// Resolves a branch by name.
    async fn get_branch(&self, name: &str) -> Result<BranchRef, HostError>;

    /// Creates a branch pointing at `sha`.
    async fn create_branch(&self, name: &str, sha: &str) -> Result<BranchRef, HostError>;

    /// Moves a branch to `sha`, optionally allowing a non-fast-forward update.
    async fn update_branch(&self, name: &str, sha: &str, force: bool)
        -> Result<BranchRef, HostError>;

    /// Deletes a branch.
    async fn delete_branch(&self, name: &str) -> Result<(), HostError>;

    /// Writes a commit object.
    ///
    /// A commit that cannot be applied onto its parents fails with
    /// [`ErrorKind::Conflict`].
    async fn create_commit(&self, commit: &NewCommit) -> Result<CommitRecord, HostError>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        pr: &NewPullRequest,
    ) -> Result<CreatedPullRequest, HostError>;

    /// Adds labels to an issue or pull request.
    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), HostError>;

    /// Posts a comment on an issue or pull request.
    async fn create_comment(&self, number: u64, body: &str) -> Result<(), HostError>;
}
