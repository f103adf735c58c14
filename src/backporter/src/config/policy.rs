//! Merge commit and conflict handling policies.

use super::ConfigError;
use std::fmt;
use std::str::FromStr;

/// What to do with merge commits found among the commits to backport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeCommitHandling {
    /// Drop merge commits from the range.
    #[default]
    Skip,
    /// Stop the whole run and explain why on the source pull request.
    Abort,
    /// Replay merge commits, keeping their parent links.
    Include,
}

impl MergeCommitHandling {
    /// Maps an input value to a policy. `fail` is accepted as an alias for
    /// `abort`; unknown values mean [`Self::Include`].
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        match value.trim() {
            "skip" => Self::Skip,
            "abort" | "fail" => Self::Abort,
            _ => Self::Include,
        }
    }
}

impl fmt::Display for MergeCommitHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
            Self::Include => "include",
        })
    }
}

/// What to do when a commit cannot be replayed cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictHandling {
    /// Delete the backport branch and report the conflict.
    #[default]
    Abort,
    /// Open a draft pull request with manual resolution steps.
    Draft,
}

impl FromStr for ConflictHandling {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "abort" => Ok(Self::Abort),
            "draft" => Ok(Self::Draft),
            other => Err(ConfigError::InvalidConflictHandling {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConflictHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abort => "abort",
            Self::Draft => "draft",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_merge_commit_handling_means_include() {
        assert_eq!(MergeCommitHandling::from_input("skip"), MergeCommitHandling::Skip);
        assert_eq!(MergeCommitHandling::from_input("abort"), MergeCommitHandling::Abort);
        assert_eq!(MergeCommitHandling::from_input("fail"), MergeCommitHandling::Abort);
        assert_eq!(MergeCommitHandling::from_input("keep"), MergeCommitHandling::Include);
        assert_eq!(MergeCommitHandling::from_input("include"), MergeCommitHandling::Include);
    }

    #[test]
    fn parses_conflict_handling() {
        assert_eq!("draft".parse::<ConflictHandling>().unwrap(), ConflictHandling::Draft);
        assert!(matches!(
            "merge".parse::<ConflictHandling>(),
            Err(ConfigError::InvalidConflictHandling { .. })
        ));
    }
}
