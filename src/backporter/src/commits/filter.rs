//! Merge commit policy.

use crate::config::MergeCommitHandling;
use crate::host::CommitRecord;
use tracing::info;

/// Commits left after applying the merge commit policy.
#[derive(Debug, Clone)]
pub enum FilterOutcome {
    /// Commits to replay, oldest first.
    Commits(Vec<CommitRecord>),
    /// A merge commit was found under the abort policy.
    Aborted {
        /// SHA of the first merge commit found.
        merge_commit: String,
    },
}

/// Applies `handling` to the merge commits in `commits`.
///
/// Runs once per pull request. An abort stops every target.
#[must_use]
pub fn filter_merge_commits(
    commits: Vec<CommitRecord>,
    handling: MergeCommitHandling,
) -> FilterOutcome {
    match handling {
        MergeCommitHandling::Include => FilterOutcome::Commits(commits),
        MergeCommitHandling::Abort => match commits.iter().find(|c| c.is_merge()) {
            Some(merge) => FilterOutcome::Aborted {
                merge_commit: merge.sha.clone(),
            },
            None => FilterOutcome::Commits(commits),
        },
        MergeCommitHandling::Skip => FilterOutcome::Commits(
            commits
                .into_iter()
                .filter(|commit| {
                    if commit.is_merge() {
                        info!(sha = %commit.sha, "Skipping merge commit");
                        false
                    } else {
                        true
                    }
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, parents: usize) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            message: sha.to_string(),
            tree_sha: format!("tree-{sha}"),
            author: None,
            committer: None,
            parents: (0..parents).map(|i| format!("p{i}")).collect(),
            files: Vec::new(),
        }
    }

    fn shas(outcome: FilterOutcome) -> Vec<String> {
        match outcome {
            FilterOutcome::Commits(commits) => commits.into_iter().map(|c| c.sha).collect(),
            FilterOutcome::Aborted { merge_commit } => panic!("aborted at {merge_commit}"),
        }
    }

    #[test]
    fn skip_drops_merge_commits() {
        let commits = vec![commit("a", 1), commit("m", 2), commit("b", 1)];
        let outcome = filter_merge_commits(commits, MergeCommitHandling::Skip);
        assert_eq!(shas(outcome), ["a", "b"]);
    }

    #[test]
    fn include_keeps_everything() {
        let commits = vec![commit("a", 1), commit("m", 2)];
        let outcome = filter_merge_commits(commits, MergeCommitHandling::Include);
        assert_eq!(shas(outcome), ["a", "m"]);
    }

    #[test]
    fn abort_reports_first_merge_commit() {
        let commits = vec![commit("a", 1), commit("m1", 2), commit("m2", 3)];
        let outcome = filter_merge_commits(commits, MergeCommitHandling::Abort);
        assert!(matches!(
            outcome,
            FilterOutcome::Aborted { merge_commit } if merge_commit == "m1"
        ));
    }

    #[test]
    fn abort_without_merge_commits_passes_through() {
        let commits = vec![commit("a", 1), commit("b", 1)];
        let outcome = filter_merge_commits(commits, MergeCommitHandling::Abort);
        assert_eq!(shas(outcome), ["a", "b"]);
    }
}
