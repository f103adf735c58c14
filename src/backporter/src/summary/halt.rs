//! Reasons a run stops before replaying anything.

use serde::Serialize;
use std::fmt;

/// Why a run ended without processing any target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HaltReason {
    /// The source pull request is not merged.
    NotMerged,
    /// No label names an existing target branch.
    NoTargets,
    /// A merge commit was found under the abort policy.
    MergeCommitAbort {
        /// SHA of the merge commit.
        sha: String,
    },
    /// No commits are left after applying the merge commit policy.
    NothingToBackport,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMerged => f.write_str("pull request is not merged"),
            Self::NoTargets => f.write_str("no target branches"),
            Self::MergeCommitAbort { sha } => write!(f, "found merge commit {sha}"),
            Self::NothingToBackport => f.write_str("no commits to backport"),
        }
    }
}
