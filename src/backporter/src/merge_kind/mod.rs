//! Merge kind inference.
//!
//! The code host does not report which strategy landed a pull request, so it
//! is inferred from the merge commit: several parents mean a merge commit; a
//! single-commit pull request is always a squash; otherwise the merge commit's
//! file list is compared with the pull request's aggregate file list. Equal
//! lists mean a squash, anything else a rebase.

mod error;

pub use error::MergeKindError;

use crate::host::{CodeHost, CommitFile, PullRequest};
use std::fmt;
use tracing::debug;

/// How a pull request reached its base branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// Not merged, or merged in a way that cannot be backported.
    Invalid,
    /// "Squash and merge": one new commit holding all changes.
    Squash,
    /// "Create a merge commit": the original commits plus a merge commit.
    MergeCommit,
    /// "Rebase and merge": every commit rewritten onto the base branch.
    Rebase,
}

impl fmt::Display for MergeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "unknown",
            Self::Squash => "Squash and Merge",
            Self::MergeCommit => "Merge Commit",
            Self::Rebase => "Rebase and Merge",
        })
    }
}

/// Classifies how `pr` was merged.
///
/// Returns [`MergeKind::Invalid`] for pull requests that are not merged or
/// carry no merge commit SHA.
///
/// # Errors
///
/// Returns [`MergeKindError::OrphanMergeCommit`] when the merge commit has no
/// parents, and [`MergeKindError::Host`] when a lookup fails.
pub async fn resolve_merge_kind(
    host: &dyn CodeHost,
    pr: &PullRequest,
) -> Result<MergeKind, MergeKindError> {
    let Some(merge_sha) = pr.merge_commit_sha.as_deref().filter(|_| pr.merged) else {
        return Ok(MergeKind::Invalid);
    };

    let merge_commit = host.get_commit(merge_sha).await?;
    if merge_commit.parents.is_empty() {
        return Err(MergeKindError::OrphanMergeCommit {
            sha: merge_sha.to_string(),
        });
    }

    if merge_commit.is_merge() {
        return Ok(MergeKind::MergeCommit);
    }

    if pr.commits == 1 {
        return Ok(MergeKind::Squash);
    }

    let pr_files = host.list_pull_request_files(pr).await?;
    let kind = if files_match(&merge_commit.files, &pr_files) {
        MergeKind::Squash
    } else {
        MergeKind::Rebase
    };
    debug!(
        pr = pr.number,
        merge_files = merge_commit.files.len(),
        pr_files = pr_files.len(),
        %kind,
        "Compared merge commit with pull request files"
    );
    Ok(kind)
}

/// Compares two file lists entry by entry, in order.
fn files_match(merge_files: &[CommitFile], pr_files: &[CommitFile]) -> bool {
    merge_files.len() == pr_files.len()
        && merge_files.iter().zip(pr_files).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CommitRecord, FakeHost};

    fn file(name: &str, additions: u64) -> CommitFile {
        CommitFile {
            filename: name.to_string(),
            additions,
            deletions: 0,
            changes: additions,
            patch: Some(format!("@@ +{additions} @@")),
        }
    }

    fn merge_commit(parents: &[&str], files: Vec<CommitFile>) -> CommitRecord {
        CommitRecord {
            sha: "merge".to_string(),
            message: "merged".to_string(),
            tree_sha: "tree".to_string(),
            author: None,
            committer: None,
            parents: parents.iter().map(ToString::to_string).collect(),
            files,
        }
    }

    fn merged_pr(commits: u64) -> PullRequest {
        PullRequest {
            number: 7,
            title: "Fix".to_string(),
            body: String::new(),
            merged: true,
            merge_commit_sha: Some("merge".to_string()),
            commits,
            changed_files: 2,
            labels: Vec::new(),
        }
    }

    #[tokio::test]
    async fn unmerged_pull_request_is_invalid() {
        let host = FakeHost::new();
        let mut pr = merged_pr(1);
        pr.merged = false;

        let kind = resolve_merge_kind(&host, &pr).await.unwrap();
        assert_eq!(kind, MergeKind::Invalid);
    }

    #[tokio::test]
    async fn several_parents_mean_merge_commit() {
        let host = FakeHost::new();
        host.insert_commit(merge_commit(&["base", "feature"], Vec::new()));

        let kind = resolve_merge_kind(&host, &merged_pr(3)).await.unwrap();
        assert_eq!(kind, MergeKind::MergeCommit);
    }

    #[tokio::test]
    async fn single_commit_is_squash_regardless_of_files() {
        let host = FakeHost::new();
        host.insert_commit(merge_commit(&["base"], vec![file("a.rs", 1)]));
        host.insert_pull_request_files(7, vec![file("b.rs", 9)]);

        let kind = resolve_merge_kind(&host, &merged_pr(1)).await.unwrap();
        assert_eq!(kind, MergeKind::Squash);
    }

    #[tokio::test]
    async fn identical_files_mean_squash() {
        let host = FakeHost::new();
        let files = vec![file("a.rs", 1), file("b.rs", 2)];
        host.insert_commit(merge_commit(&["base"], files.clone()));
        host.insert_pull_request_files(7, files);

        let kind = resolve_merge_kind(&host, &merged_pr(2)).await.unwrap();
        assert_eq!(kind, MergeKind::Squash);
    }

    #[tokio::test]
    async fn differing_files_mean_rebase() {
        let host = FakeHost::new();
        host.insert_commit(merge_commit(&["base"], vec![file("b.rs", 2)]));
        host.insert_pull_request_files(7, vec![file("a.rs", 1), file("b.rs", 2)]);

        let kind = resolve_merge_kind(&host, &merged_pr(2)).await.unwrap();
        assert_eq!(kind, MergeKind::Rebase);
    }

    #[tokio::test]
    async fn orphan_merge_commit_fails() {
        let host = FakeHost::new();
        host.insert_commit(merge_commit(&[], Vec::new()));

        let result = resolve_merge_kind(&host, &merged_pr(2)).await;
        assert!(matches!(
            result,
            Err(MergeKindError::OrphanMergeCommit { .. })
        ));
    }

    #[test]
    fn file_order_matters() {
        let a = vec![file("a.rs", 1), file("b.rs", 2)];
        let b = vec![file("b.rs", 2), file("a.rs", 1)];
        assert!(files_match(&a, &a));
        assert!(!files_match(&a, &b));
    }
}
