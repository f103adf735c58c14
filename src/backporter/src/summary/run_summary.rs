//! Run summary types.

use super::halt::HaltReason;
use crate::cherry_pick::{AttemptOutcome, BackportAttempt};
use crate::merge_kind::MergeKind;
use crate::templates::{CreatedEntry, FailedEntry};

/// Summary of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Source pull request number.
    pub pr_number: u64,

    /// How the source pull request was merged, once resolved.
    pub merge_kind: Option<MergeKind>,

    /// Number of commits selected for replay.
    pub commits: usize,

    /// Per-target attempts, in processing order.
    pub attempts: Vec<BackportAttempt>,

    /// Set when the run stopped before processing targets.
    pub halt: Option<HaltReason>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(pr_number: u64) -> Self {
        Self {
            pr_number,
            merge_kind: None,
            commits: 0,
            attempts: Vec::new(),
            halt: None,
        }
    }

    /// Creates a summary for a run that stopped early.
    #[must_use]
    pub fn halted(pr_number: u64, reason: HaltReason) -> Self {
        Self {
            halt: Some(reason),
            ..Self::new(pr_number)
        }
    }

    /// Records a finished attempt.
    pub fn record(&mut self, attempt: BackportAttempt) {
        self.attempts.push(attempt);
    }

    /// Number of targets with a regular pull request.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Succeeded { .. }))
    }

    /// Number of targets with a draft pull request.
    #[must_use]
    pub fn drafts(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::DraftCreated { .. }))
    }

    /// Number of targets that produced any pull request.
    #[must_use]
    pub fn created(&self) -> usize {
        self.succeeded() + self.drafts()
    }

    /// Number of targets that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Failed { .. }))
    }

    /// Returns true if any target failed or needs manual resolution.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.drafts() > 0
    }

    /// Returns true if every attempted target succeeded.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }

    /// Entries for the created pull requests.
    #[must_use]
    pub fn created_entries(&self) -> Vec<CreatedEntry> {
        self.attempts
            .iter()
            .filter_map(|attempt| {
                attempt.outcome.pull_request().map(|number| CreatedEntry {
                    target: attempt.target.clone(),
                    branch: attempt.branch.clone(),
                    number,
                    draft: matches!(attempt.outcome, AttemptOutcome::DraftCreated { .. }),
                })
            })
            .collect()
    }

    /// Entries for the failed targets.
    #[must_use]
    pub fn failed_entries(&self) -> Vec<FailedEntry> {
        self.attempts
            .iter()
            .filter_map(|attempt| match &attempt.outcome {
                AttemptOutcome::Failed { reason } => Some(FailedEntry {
                    target: attempt.target.clone(),
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&AttemptOutcome) -> bool) -> usize {
        self.attempts.iter().filter(|a| predicate(&a.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(target: &str, outcome: AttemptOutcome) -> BackportAttempt {
        BackportAttempt {
            target: target.to_string(),
            branch: format!("backport-1-to-{target}"),
            remaining: Vec::new(),
            outcome,
        }
    }

    #[test]
    fn can_record_attempts() {
        let mut summary = RunSummary::new(1);
        summary.record(attempt("a", AttemptOutcome::Succeeded { pr: 10 }));
        summary.record(attempt(
            "b",
            AttemptOutcome::DraftCreated {
                pr: 11,
                conflict: "c".to_string(),
            },
        ));
        summary.record(attempt(
            "c",
            AttemptOutcome::Failed {
                reason: "boom".to_string(),
            },
        ));

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.drafts(), 1);
        assert_eq!(summary.created(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(summary.has_failures());

        let created = summary.created_entries();
        assert_eq!(created.len(), 2);
        assert!(created[1].draft);
        assert_eq!(summary.failed_entries()[0].target, "c");
    }

    #[test]
    fn halted_run_is_successful() {
        let summary = RunSummary::halted(1, HaltReason::NoTargets);
        assert!(summary.all_success());
        assert_eq!(summary.halt, Some(HaltReason::NoTargets));
    }
}
