//! Code host data model.

use serde::Serialize;

/// Immutable snapshot of the pull request being backported.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Pull request description (empty when the PR has none).
    pub body: String,

    /// Whether the pull request has been merged.
    pub merged: bool,

    /// SHA of the commit the merge produced on the base branch.
    pub merge_commit_sha: Option<String>,

    /// Number of commits on the pull request.
    pub commits: u64,

    /// Number of files changed by the pull request.
    pub changed_files: u64,

    /// Label names, in the order the code host reports them.
    pub labels: Vec<String>,
}

/// Name, email and optional timestamp of a commit author or committer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// ISO 8601 timestamp, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Signature {
    /// Creates a signature without a timestamp.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: None,
        }
    }
}

/// A single file entry of a commit or pull request diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    /// Path of the changed file.
    pub filename: String,

    /// Number of added lines.
    pub additions: u64,

    /// Number of removed lines.
    pub deletions: u64,

    /// Total number of changed lines.
    pub changes: u64,

    /// Unified diff of the file, absent for binary or oversized files.
    pub patch: Option<String>,
}

/// A commit as reported by the code host.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Commit SHA.
    pub sha: String,

    /// Full commit message.
    pub message: String,

    /// SHA of the tree the commit points to.
    pub tree_sha: String,

    /// Commit author, preserved when replaying.
    pub author: Option<Signature>,

    /// Commit committer, rewritten when replaying.
    pub committer: Option<Signature>,

    /// Parent SHAs, in order.
    pub parents: Vec<String>,

    /// Changed files. Only populated when fetched by SHA.
    pub files: Vec<CommitFile>,
}

impl CommitRecord {
    /// Returns true if the commit has more than one parent.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// A branch reference and the commit it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Branch name without any `refs/heads/` prefix.
    pub name: String,

    /// SHA of the branch tip.
    pub sha: String,
}

/// A commit object to be written by the code host.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    /// Commit message.
    pub message: String,

    /// Tree SHA.
    #[serde(rename = "tree")]
    pub tree_sha: String,

    /// Parent SHAs, in order.
    pub parents: Vec<String>,

    /// Author, when different from the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Signature>,

    /// Committer, when different from the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<Signature>,
}

/// Request for a new pull request.
#[derive(Debug, Clone)]
pub struct NewPullRequest {
    /// Pull request title.
    pub title: String,

    /// Pull request description.
    pub body: String,

    /// Branch holding the changes.
    pub head: String,

    /// Branch the changes should land on.
    pub base: String,

    /// Whether to open the pull request as a draft.
    pub draft: bool,

    /// Whether maintainers may push to the head branch.
    pub maintainer_can_modify: bool,
}

/// A pull request created by the code host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    /// Pull request number.
    pub number: u64,

    /// SHA of the head commit the pull request was opened with.
    pub head_sha: String,

    /// Whether the pull request is a draft.
    pub draft: bool,
}

/// Strips `refs/heads/` and `refs/remotes/<remote>/` prefixes from a ref name.
#[must_use]
pub fn trim_ref_prefix(name: &str) -> &str {
    if let Some(branch) = name.strip_prefix("refs/heads/") {
        return branch;
    }
    if let Some(remote_ref) = name.strip_prefix("refs/remotes/") {
        if let Some((_, branch)) = remote_ref.split_once('/') {
            return branch;
        }
    }
    name
}
