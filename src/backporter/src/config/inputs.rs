//! Raw action inputs.

/// Default pattern mapping `backport-to-support/X.Y` labels to `support/X.Y`.
pub const DEFAULT_LABEL_PATTERN: &str = r"^backport-to-(support\/\d+\.\d+)$";

/// Default merge commit handling.
pub const DEFAULT_MERGE_COMMIT_HANDLING: &str = "skip";

/// Default conflict handling.
pub const DEFAULT_CONFLICT_HANDLING: &str = "abort";

/// Unvalidated inputs, as received from the action environment.
///
/// Turn them into a [`BackportConfig`](super::BackportConfig) with
/// [`BackportConfig::from_inputs`](super::BackportConfig::from_inputs).
#[derive(Clone)]
pub struct BackportInputs {
    /// Token used for every code host call.
    pub github_token: String,

    /// Committer name for replayed commits.
    pub committer: String,

    /// Committer email for replayed commits.
    pub email: String,

    /// Backport pull request title template.
    pub title: String,

    /// Backport pull request description template.
    pub description: String,

    /// Pattern selecting the labels to copy onto backport pull requests.
    pub copy_labels_pattern: String,

    /// Pattern whose first capturing group names the target branch.
    pub label_pattern: String,

    /// `abort` or `draft`.
    pub conflict_handling: String,

    /// `skip`, `abort`, or anything else for include.
    pub merge_commit_handling: String,
}

impl std::fmt::Debug for BackportInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackportInputs")
            .field("github_token", &"***")
            .field("committer", &self.committer)
            .field("email", &self.email)
            .field("label_pattern", &self.label_pattern)
            .field("copy_labels_pattern", &self.copy_labels_pattern)
            .field("conflict_handling", &self.conflict_handling)
            .field("merge_commit_handling", &self.merge_commit_handling)
            .finish_non_exhaustive()
    }
}

impl Default for BackportInputs {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            committer: String::new(),
            email: String::new(),
            title: String::new(),
            description: String::new(),
            copy_labels_pattern: String::new(),
            label_pattern: DEFAULT_LABEL_PATTERN.to_string(),
            conflict_handling: DEFAULT_CONFLICT_HANDLING.to_string(),
            merge_commit_handling: DEFAULT_MERGE_COMMIT_HANDLING.to_string(),
        }
    }
}
