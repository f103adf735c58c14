//! Commit range selection.
//!
//! Turns a merged pull request and its [`MergeKind`] into the ordered list of
//! commits that carry its changes, then applies the merge commit policy.

mod cache;
mod error;
mod filter;

pub use cache::CommitCache;
pub use error::SelectionError;
pub use filter::{filter_merge_commits, FilterOutcome};

use crate::host::{CodeHost, CommitRecord, PullRequest};
use crate::merge_kind::MergeKind;
use tracing::info;

/// Selects the commits representing `pr`'s changes, oldest first.
///
/// - Squash: the merge commit alone.
/// - Merge commit: every commit listed on the pull request except the merge
///   commit itself.
/// - Rebase: the `pr.commits` most recent commits reachable from the merge
///   commit, as listed by the host. This assumes nothing else landed on the
///   base branch in between.
///
/// # Errors
///
/// Returns [`SelectionError`] when the pull request has no merge commit, the
/// kind is [`MergeKind::Invalid`], the history is shorter than expected, or a
/// lookup fails.
pub async fn select_commits(
    host: &dyn CodeHost,
    cache: &mut CommitCache,
    pr: &PullRequest,
    kind: MergeKind,
) -> Result<Vec<CommitRecord>, SelectionError> {
    let merge_sha = pr
        .merge_commit_sha
        .as_deref()
        .ok_or(SelectionError::NotMerged { number: pr.number })?;

    let commits = match kind {
        MergeKind::Invalid => return Err(SelectionError::Unsupported { kind }),
        MergeKind::Squash => vec![host.get_commit(merge_sha).await?],
        MergeKind::MergeCommit => cache
            .pull_request_commits(host, pr)
            .await?
            .iter()
            .filter(|commit| commit.sha != merge_sha)
            .cloned()
            .collect(),
        MergeKind::Rebase => {
            let expected = usize::try_from(pr.commits).unwrap_or(usize::MAX);
            let mut commits = host.list_commits_from(merge_sha, expected).await?;
            if commits.len() != expected {
                return Err(SelectionError::ShortHistory {
                    sha: merge_sha.to_string(),
                    expected,
                    found: commits.len(),
                });
            }
            commits.reverse();
            commits
        }
    };

    info!(pr = pr.number, %kind, count = commits.len(), "Selected commits");
    Ok(commits)
}
