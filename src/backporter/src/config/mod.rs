//! Backport configuration.
//!
//! [`BackportInputs`] holds the raw action inputs. [`BackportConfig::from_inputs`]
//! validates them once, compiles the label patterns and parses the policies,
//! so the rest of the crate only ever sees a valid configuration.

mod error;
mod inputs;
mod policy;

pub use error::ConfigError;
pub use inputs::{
    BackportInputs, DEFAULT_CONFLICT_HANDLING, DEFAULT_LABEL_PATTERN,
    DEFAULT_MERGE_COMMIT_HANDLING,
};
pub use policy::{ConflictHandling, MergeCommitHandling};

use crate::host::Signature;
use regex::Regex;
use std::fmt;

/// Validated backport configuration.
#[derive(Clone)]
pub struct BackportConfig {
    github_token: String,
    committer: Signature,
    title: String,
    description: String,
    label_pattern: Regex,
    copy_labels_pattern: Option<Regex>,
    conflict_handling: ConflictHandling,
    merge_commit_handling: MergeCommitHandling,
}

impl BackportConfig {
    /// Validates raw inputs into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required input is empty, a pattern does
    /// not compile, or conflict handling is not `abort` or `draft`.
    pub fn from_inputs(inputs: BackportInputs) -> Result<Self, ConfigError> {
        let github_token = required("github_token", inputs.github_token)?;
        let committer = required("committer", inputs.committer)?;
        let email = required("committer_email", inputs.email)?;
        let title = required("pr_title", inputs.title)?;
        let description = required("pr_description", inputs.description)?;

        let copy_labels_pattern = if inputs.copy_labels_pattern.trim().is_empty() {
            None
        } else {
            Some(compile("copy_labels_pattern", &inputs.copy_labels_pattern)?)
        };

        let label_pattern = compile(
            "label_pattern",
            &required("label_pattern", inputs.label_pattern)?,
        )?;

        let conflict_handling = inputs.conflict_handling.parse::<ConflictHandling>()?;
        let merge_commit_handling = MergeCommitHandling::from_input(&required(
            "merge_commit_handling",
            inputs.merge_commit_handling,
        )?);

        Ok(Self {
            github_token,
            committer: Signature::new(committer, email),
            title,
            description,
            label_pattern,
            copy_labels_pattern,
            conflict_handling,
            merge_commit_handling,
        })
    }

    /// Returns the code host token.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// Returns the identity replayed commits are committed as.
    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    /// Returns the backport pull request title template.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the backport pull request description template.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the pattern mapping labels to target branches.
    pub fn label_pattern(&self) -> &Regex {
        &self.label_pattern
    }

    /// Returns the pattern selecting labels to copy, if any.
    pub fn copy_labels_pattern(&self) -> Option<&Regex> {
        self.copy_labels_pattern.as_ref()
    }

    /// Returns the conflict handling policy.
    pub fn conflict_handling(&self) -> ConflictHandling {
        self.conflict_handling
    }

    /// Returns the merge commit handling policy.
    pub fn merge_commit_handling(&self) -> MergeCommitHandling {
        self.merge_commit_handling
    }
}

impl fmt::Debug for BackportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackportConfig")
            .field("committer", &self.committer)
            .field("label_pattern", &self.label_pattern.as_str())
            .field(
                "copy_labels_pattern",
                &self.copy_labels_pattern.as_ref().map(Regex::as_str),
            )
            .field("conflict_handling", &self.conflict_handling)
            .field("merge_commit_handling", &self.merge_commit_handling)
            .finish_non_exhaustive()
    }
}

fn required(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing { field })
    } else {
        Ok(value)
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_inputs() -> BackportInputs {
        BackportInputs {
            github_token: "token".to_string(),
            committer: "backbot".to_string(),
            email: "backbot@example.com".to_string(),
            title: "[${target_branch}] ${original_pr_title}".to_string(),
            description: "Backport of #${original_pr_number}".to_string(),
            ..BackportInputs::default()
        }
    }

    #[test]
    fn applies_defaults() {
        let config = BackportConfig::from_inputs(valid_inputs()).unwrap();

        assert_eq!(config.label_pattern().as_str(), DEFAULT_LABEL_PATTERN);
        assert!(config.copy_labels_pattern().is_none());
        assert_eq!(config.conflict_handling(), ConflictHandling::Abort);
        assert_eq!(config.merge_commit_handling(), MergeCommitHandling::Skip);
        assert_eq!(config.committer().email, "backbot@example.com");
    }

    #[test]
    fn rejects_missing_required_input() {
        let mut inputs = valid_inputs();
        inputs.email = "  ".to_string();

        let result = BackportConfig::from_inputs(inputs);
        assert!(matches!(
            result,
            Err(ConfigError::Missing {
                field: "committer_email"
            })
        ));
    }

    #[test]
    fn rejects_invalid_conflict_handling() {
        let mut inputs = valid_inputs();
        inputs.conflict_handling = String::new();

        let result = BackportConfig::from_inputs(inputs);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConflictHandling { .. })
        ));
    }

    #[test]
    fn accepts_label_pattern_without_capture_group() {
        let mut inputs = valid_inputs();
        inputs.label_pattern = "^backport-to-support/2.15$".to_string();

        let config = BackportConfig::from_inputs(inputs).unwrap();
        assert_eq!(config.label_pattern().captures_len(), 1);
    }

    #[test]
    fn rejects_invalid_copy_pattern() {
        let mut inputs = valid_inputs();
        inputs.copy_labels_pattern = "(".to_string();

        let result = BackportConfig::from_inputs(inputs);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPattern {
                field: "copy_labels_pattern",
                ..
            })
        ));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = BackportConfig::from_inputs(valid_inputs()).unwrap();
        assert!(!format!("{config:?}").contains("token\""));
        assert!(!format!("{:?}", valid_inputs()).contains("\"token\""));
    }
}
