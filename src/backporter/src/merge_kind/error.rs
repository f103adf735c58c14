//! Merge kind resolution error types.

use crate::host::HostError;

/// Errors raised while classifying how a pull request was merged.
#[derive(Debug, thiserror::Error)]
pub enum MergeKindError {
    /// The merge commit has no parents, so its history cannot be inferred.
    #[error("merge commit {sha} has no parents")]
    OrphanMergeCommit {
        /// SHA of the offending merge commit.
        sha: String,
    },

    /// Fetching commits or files from the code host failed.
    #[error(transparent)]
    Host(#[from] HostError),
}
