//! Text produced for the code host.
//!
//! Backport pull request titles and bodies use literal `${...}` placeholders.
//! Bot comments are rendered with Handlebars by [`TemplateRenderer`].

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, CreatedEntry, FailedEntry, TemplateRenderer};

use crate::host::{trim_ref_prefix, PullRequest};

/// Placeholder for the target branch name.
pub const TARGET_BRANCH: &str = "${target_branch}";
/// Placeholder for the source pull request number.
pub const ORIGINAL_PR_NUMBER: &str = "${original_pr_number}";
/// Placeholder for the source pull request title.
pub const ORIGINAL_PR_TITLE: &str = "${original_pr_title}";
/// Placeholder for the source pull request description.
pub const ORIGINAL_PR_DESCRIPTION: &str = "${original_pr_description}";

/// Generates the backport branch name.
///
/// Format: "backport-{pr_number}-to-{target}"
#[must_use]
pub fn backport_branch_name(pr_number: u64, target: &str) -> String {
    format!("backport-{pr_number}-to-{}", trim_ref_prefix(target))
}

/// Substitutes the pull request placeholders in `template`.
///
/// Replacement is literal and happens once, so placeholder text inside the
/// substituted values is left alone.
#[must_use]
pub fn replace_placeholders(template: &str, target: &str, pr: &PullRequest) -> String {
    let number = pr.number.to_string();
    let replacements = [
        (TARGET_BRANCH, target),
        (ORIGINAL_PR_NUMBER, number.as_str()),
        (ORIGINAL_PR_TITLE, pr.title.as_str()),
        (ORIGINAL_PR_DESCRIPTION, pr.body.as_str()),
    ];

    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];
        for (placeholder, value) in replacements {
            if candidate.starts_with(placeholder) {
                output.push_str(value);
                rest = &candidate[placeholder.len()..];
                continue 'scan;
            }
        }
        output.push_str("${");
        rest = &candidate[2..];
    }
    output.push_str(rest);
    output
}

/// Lists the git commands that finish a conflicted backport by hand.
///
/// `branch` is the backport branch, `shas` the commits that were not replayed
/// (the conflicting one first). With `empty_base` the placeholder commit at
/// the branch tip is dropped before cherry-picking.
#[must_use]
pub fn manual_steps(branch: &str, shas: &[String], empty_base: bool) -> String {
    let branch = trim_ref_prefix(branch);
    let worktree = format!("backport/{branch}");
    let mut steps = vec![
        format!("git fetch origin {branch}"),
        format!("git worktree add --checkout {worktree} origin/{branch}"),
        format!("cd {worktree}"),
    ];
    if empty_base {
        steps.push("git reset --hard HEAD^".to_string());
    }
    steps.push(format!("git cherry-pick -x {}", shas.join(" ")));
    steps.push("git push --force-with-lease".to_string());
    steps.push("cd -".to_string());
    steps.push(format!("git worktree remove {worktree}"));
    steps.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pr() -> PullRequest {
        PullRequest {
            number: 42,
            title: "Fix ${target_branch} crash".to_string(),
            body: "Body text".to_string(),
            merged: true,
            merge_commit_sha: Some("abc123".to_string()),
            commits: 1,
            changed_files: 1,
            labels: Vec::new(),
        }
    }

    #[test]
    fn test_backport_branch_name() {
        assert_eq!(
            backport_branch_name(42, "support/2.15"),
            "backport-42-to-support/2.15"
        );
        assert_eq!(
            backport_branch_name(42, "refs/heads/main"),
            "backport-42-to-main"
        );
    }

    #[test]
    fn test_replace_placeholders() {
        let result = replace_placeholders(
            "[${target_branch}] ${original_pr_title} (#${original_pr_number})\n\n${original_pr_description}",
            "support/2.15",
            &sample_pr(),
        );
        assert_eq!(
            result,
            "[support/2.15] Fix ${target_branch} crash (#42)\n\nBody text"
        );
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let result = replace_placeholders("${unknown} $ ${", "main", &sample_pr());
        assert_eq!(result, "${unknown} $ ${");
    }

    #[test]
    fn test_manual_steps_with_empty_base() {
        let steps = manual_steps(
            "backport-42-to-support/2.15",
            &["c2".to_string(), "c3".to_string()],
            true,
        );
        let expected = [
            "git fetch origin backport-42-to-support/2.15",
            "git worktree add --checkout backport/backport-42-to-support/2.15 origin/backport-42-to-support/2.15",
            "cd backport/backport-42-to-support/2.15",
            "git reset --hard HEAD^",
            "git cherry-pick -x c2 c3",
            "git push --force-with-lease",
            "cd -",
            "git worktree remove backport/backport-42-to-support/2.15",
        ];
        assert_eq!(steps, expected.join("\n"));
    }

    #[test]
    fn test_manual_steps_without_empty_base() {
        let steps = manual_steps("backport-1-to-main", &["c2".to_string()], false);
        assert!(!steps.contains("git reset"));
        assert!(steps.contains("git cherry-pick -x c2\ngit push --force-with-lease"));
    }
}
