//! Target branch resolution.

use super::{match_label, LabelMatch};
use crate::host::{trim_ref_prefix, CodeHost};
use bstr::ByteSlice;
use regex::Regex;
use tracing::{debug, warn};

/// A branch that receives a backport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBranch {
    /// Branch name without ref prefix.
    pub name: String,
    /// Tip SHA at resolution time.
    pub sha: String,
}

/// Resolves the labels of a pull request into existing target branches.
///
/// Labels are processed in order. A label is skipped when it does not match,
/// matches without a captured branch, captures an invalid ref name, or names
/// a branch that cannot be looked up. Each branch is returned once.
pub async fn resolve_target_branches(
    host: &dyn CodeHost,
    labels: &[String],
    pattern: &Regex,
) -> Vec<TargetBranch> {
    let mut targets: Vec<TargetBranch> = Vec::new();

    for label in labels {
        let candidate = match match_label(label, pattern) {
            LabelMatch::NoMatch => {
                debug!(label = %label, "Label does not match target pattern");
                continue;
            }
            LabelMatch::NoCapture => {
                warn!(label = %label, "Label matched without capturing a branch name");
                continue;
            }
            LabelMatch::Branch(branch) => trim_ref_prefix(branch),
        };

        if gix_validate::reference::name_partial(candidate.as_bytes().as_bstr()).is_err() {
            warn!(label = %label, branch = %candidate, "Invalid branch name");
            continue;
        }

        if targets.iter().any(|t| t.name == candidate) {
            debug!(label = %label, branch = %candidate, "Duplicate target branch");
            continue;
        }

        match host.get_branch(candidate).await {
            Ok(branch) => targets.push(TargetBranch {
                name: candidate.to_string(),
                sha: branch.sha,
            }),
            Err(e) if e.is_not_found() => {
                warn!(label = %label, branch = %candidate, "Target branch does not exist");
            }
            Err(e) => {
                warn!(
                    label = %label,
                    branch = %candidate,
                    error = %e,
                    "Failed to look up target branch"
                );
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ErrorKind, FakeHost};

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn resolves_existing_branches_in_label_order() {
        let host = FakeHost::new();
        host.insert_branch("support/2.15", "tip-215");
        host.insert_branch("support/2.14", "tip-214");
        let pattern = Regex::new(r"^backport-to-(support\/\d+\.\d+)$").unwrap();

        let targets = resolve_target_branches(
            &host,
            &labels(&["backport-to-support/2.15", "bug", "backport-to-support/2.14"]),
            &pattern,
        )
        .await;

        assert_eq!(
            targets,
            [
                TargetBranch {
                    name: "support/2.15".to_string(),
                    sha: "tip-215".to_string()
                },
                TargetBranch {
                    name: "support/2.14".to_string(),
                    sha: "tip-214".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn deduplicates_branches_from_different_labels() {
        let host = FakeHost::new();
        host.insert_branch("main", "tip");
        let pattern = Regex::new(r"^(?:backport|bp)-(.+)$").unwrap();

        let targets =
            resolve_target_branches(&host, &labels(&["backport-main", "bp-main"]), &pattern)
                .await;

        assert_eq!(targets.len(), 1);
    }

    #[tokio::test]
    async fn skips_missing_and_invalid_branches() {
        let host = FakeHost::new();
        host.insert_branch("support/2.15", "tip");
        let pattern = Regex::new(r"^backport-to-(.*)$").unwrap();

        let targets = resolve_target_branches(
            &host,
            &labels(&[
                "backport-to-support/9.9",
                "backport-to-bad..name",
                "backport-to-",
                "backport-to-support/2.15",
            ]),
            &pattern,
        )
        .await;

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "support/2.15");
    }

    #[tokio::test]
    async fn strips_ref_prefixes() {
        let host = FakeHost::new();
        host.insert_branch("release", "tip");
        let pattern = Regex::new(r"^to:(.+)$").unwrap();

        let targets =
            resolve_target_branches(&host, &labels(&["to:refs/heads/release"]), &pattern)
                .await;

        assert_eq!(targets[0].name, "release");
    }

    #[tokio::test]
    async fn lookup_failure_skips_only_that_label() {
        let host = FakeHost::new();
        host.insert_branch("support/2.14", "tip-214");
        host.insert_branch("support/2.15", "tip-215");
        host.fail_branch_lookup("support/2.14", ErrorKind::Transient);
        let pattern = Regex::new(r"^backport-to-(support\/\d+\.\d+)$").unwrap();

        let targets = resolve_target_branches(
            &host,
            &labels(&["backport-to-support/2.14", "backport-to-support/2.15"]),
            &pattern,
        )
        .await;

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "support/2.15");
    }

    #[tokio::test]
    async fn pattern_without_group_resolves_nothing() {
        let host = FakeHost::new();
        host.insert_branch("support/2.15", "tip");
        let pattern = Regex::new(r"^backport-to-support/2\.15$").unwrap();

        let targets =
            resolve_target_branches(&host, &labels(&["backport-to-support/2.15"]), &pattern)
                .await;

        assert!(targets.is_empty());
    }
}
