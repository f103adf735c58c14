//! Comment renderer.

use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use serde_json::{json, Value};

const NOT_MERGED: &str =
    "⚠️ For security reasons, only merged pull requests are backported. Aborting.";

const MERGE_COMMIT_ABORT: &str = "⚠️ Found merge commit {{sha}} in pull request #{{number}}, \
failing backport as per configuration.";

const NO_COMMITS: &str =
    "⚠️ No commits to cherry-pick after applying configuration, skipping backport.";

const CONFLICT_ABORT: &str = "⚠️ Conflict occurred while backporting commit {{sha}} to branch \
`{{target}}`. Aborting backport as per configuration.";

const CONFLICT_DRAFT: &str = "⚠️ Backporting commit {{sha}} to branch `{{target}}` causes a \
conflict. Created draft PR #{{draft}} for manual resolution.

### Manual Backport Steps
```bash
{{steps}}
```";

const SUMMARY: &str = "✅ Successfully created backport PR(s) to the following branch(es): {{targets}}
---
{{#each created}}- #{{number}} (`{{branch}}` into `{{target}}`){{#if draft}} draft, needs manual conflict resolution{{/if}}
{{/each}}{{#if failed}}
❌ Failed to backport to:
{{#each failed}}- `{{target}}`: {{reason}}
{{/each}}{{/if}}";

const NOTHING_CREATED: &str = "⚠️ No backport pull requests were created.
{{#each failed}}- `{{target}}`: {{reason}}
{{/each}}";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// A target that received a backport pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedEntry {
    /// Target branch.
    pub target: String,
    /// Backport branch.
    pub branch: String,
    /// Backport pull request number.
    pub number: u64,
    /// Whether the pull request is a draft awaiting conflict resolution.
    pub draft: bool,
}

/// A target whose backport failed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    /// Target branch.
    pub target: String,
    /// Why the backport failed.
    pub reason: String,
}

/// Renders the comments posted on pull requests.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Notice for pull requests that are not merged.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_not_merged(&self) -> Result<String, super::TemplateError> {
        self.render_template(NOT_MERGED, &json!({}))
    }

    /// Notice for a run stopped by a merge commit.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_merge_commit_abort(
        &self,
        sha: &str,
        number: u64,
    ) -> Result<String, super::TemplateError> {
        self.render_template(MERGE_COMMIT_ABORT, &json!({ "sha": sha, "number": number }))
    }

    /// Notice for a run left without commits to replay.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_no_commits(&self) -> Result<String, super::TemplateError> {
        self.render_template(NO_COMMITS, &json!({}))
    }

    /// Notice for a conflict under the abort policy.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_conflict_abort(
        &self,
        sha: &str,
        target: &str,
    ) -> Result<String, super::TemplateError> {
        self.render_template(CONFLICT_ABORT, &json!({ "sha": sha, "target": target }))
    }

    /// Notice for a conflict under the draft policy, with manual steps.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_conflict_draft(
        &self,
        sha: &str,
        target: &str,
        draft: u64,
        steps: &str,
    ) -> Result<String, super::TemplateError> {
        self.render_template(
            CONFLICT_DRAFT,
            &json!({ "sha": sha, "target": target, "draft": draft, "steps": steps }),
        )
    }

    /// Final summary listing created pull requests and failed targets.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(
        &self,
        created: &[CreatedEntry],
        failed: &[FailedEntry],
    ) -> Result<String, super::TemplateError> {
        let targets = created
            .iter()
            .map(|entry| format!("`{}`", entry.target))
            .collect::<Vec<_>>()
            .join(", ");
        self.render_template(
            SUMMARY,
            &json!({ "targets": targets, "created": created, "failed": failed }),
        )
    }

    /// Final notice when no pull request was created.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_nothing_created(
        &self,
        failed: &[FailedEntry],
    ) -> Result<String, super::TemplateError> {
        self.render_template(NOTHING_CREATED, &json!({ "failed": failed }))
    }

    fn render_template(
        &self,
        template: &str,
        data: &Value,
    ) -> Result<String, super::TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_summary() {
        let renderer = TemplateRenderer::new();
        let created = [
            CreatedEntry {
                target: "support/2.15".to_string(),
                branch: "backport-42-to-support/2.15".to_string(),
                number: 1001,
                draft: false,
            },
            CreatedEntry {
                target: "support/2.14".to_string(),
                branch: "backport-42-to-support/2.14".to_string(),
                number: 1002,
                draft: true,
            },
        ];

        let result = renderer.render_summary(&created, &[]).unwrap();

        assert!(result.starts_with(
            "✅ Successfully created backport PR(s) to the following branch(es): `support/2.15`, `support/2.14`\n---\n"
        ));
        assert!(result.contains("- #1001 (`backport-42-to-support/2.15` into `support/2.15`)\n"));
        assert!(result.contains("- #1002 (`backport-42-to-support/2.14` into `support/2.14`) draft"));
        assert!(!result.contains("Failed"));
    }

    #[test]
    fn test_render_summary_with_failures() {
        let renderer = TemplateRenderer::new();
        let created = [CreatedEntry {
            target: "main".to_string(),
            branch: "backport-1-to-main".to_string(),
            number: 5,
            draft: false,
        }];
        let failed = [FailedEntry {
            target: "release".to_string(),
            reason: "branch already exists".to_string(),
        }];

        let result = renderer.render_summary(&created, &failed).unwrap();

        assert!(result.contains("❌ Failed to backport to:\n- `release`: branch already exists\n"));
    }

    #[test]
    fn test_render_conflict_draft() {
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render_conflict_draft("c2", "support/2.15", 1001, "git fetch origin x")
            .unwrap();

        assert!(result.contains("commit c2 to branch `support/2.15`"));
        assert!(result.contains("draft PR #1001"));
        assert!(result.ends_with("```bash\ngit fetch origin x\n```"));
    }

    #[test]
    fn test_no_html_escaping() {
        let renderer = TemplateRenderer::new();
        let result = renderer.render_conflict_abort("<sha>", "a&b").unwrap();

        assert!(result.contains("commit <sha> to branch `a&b`"));
    }

    #[test]
    fn test_render_nothing_created() {
        let renderer = TemplateRenderer::new();
        let result = renderer
            .render_nothing_created(&[FailedEntry {
                target: "main".to_string(),
                reason: "conflict".to_string(),
            }])
            .unwrap();

        assert_eq!(
            result,
            "⚠️ No backport pull requests were created.\n- `main`: conflict\n"
        );
    }
}
