//! Commit selection error types.

use crate::host::HostError;
use crate::merge_kind::MergeKind;

/// Errors raised while selecting the commits to backport.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The pull request has no merge commit to select from.
    #[error("pull request #{number} has no merge commit")]
    NotMerged {
        /// Pull request number.
        number: u64,
    },

    /// Commits cannot be selected for this merge kind.
    #[error("cannot select commits for merge kind {kind}")]
    Unsupported {
        /// The unsupported merge kind.
        kind: MergeKind,
    },

    /// Fewer commits precede the merge commit than the pull request holds.
    #[error("expected {expected} commits ending at {sha}, found {found}")]
    ShortHistory {
        /// Merge commit SHA.
        sha: String,
        /// Commit count of the pull request.
        expected: usize,
        /// Commits actually found.
        found: usize,
    },

    /// Code host lookup failed.
    #[error(transparent)]
    Host(#[from] HostError),
}
