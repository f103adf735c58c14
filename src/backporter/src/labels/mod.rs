//! Label driven target selection.
//!
//! Target branches come from pull request labels matched against a pattern
//! with one capturing group. A second, optional pattern selects labels that
//! are copied onto every backport pull request.

mod targets;

pub use targets::{resolve_target_branches, TargetBranch};

use regex::Regex;

/// Result of matching a single label against the target pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMatch<'a> {
    /// The label does not match.
    NoMatch,
    /// The label matches but the capturing group is absent or empty.
    NoCapture,
    /// The label names a candidate branch.
    Branch(&'a str),
}

/// Matches `label` against the target branch pattern.
#[must_use]
pub fn match_label<'a>(label: &'a str, pattern: &Regex) -> LabelMatch<'a> {
    let Some(captures) = pattern.captures(label) else {
        return LabelMatch::NoMatch;
    };
    match captures.get(1).map(|m| m.as_str()) {
        Some(branch) if !branch.is_empty() => LabelMatch::Branch(branch),
        _ => LabelMatch::NoCapture,
    }
}

/// Returns the labels to copy onto backport pull requests, in label order.
///
/// A label is copied when it matches `copy_pattern` and does not match
/// `target_pattern`. Nothing is copied without a copy pattern.
#[must_use]
pub fn labels_to_copy(
    labels: &[String],
    target_pattern: &Regex,
    copy_pattern: Option<&Regex>,
) -> Vec<String> {
    let Some(copy_pattern) = copy_pattern else {
        return Vec::new();
    };
    labels
        .iter()
        .filter(|label| copy_pattern.is_match(label) && !target_pattern.is_match(label))
        .cloned()
        .collect()
}
