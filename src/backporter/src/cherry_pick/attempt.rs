//! Backport attempt types.

use serde::Serialize;
use std::fmt;

/// Terminal outcome of backporting to one target branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Every commit was replayed and a pull request opened.
    Succeeded {
        /// Backport pull request number.
        pr: u64,
    },

    /// A conflict left a draft pull request for manual resolution.
    DraftCreated {
        /// Draft pull request number.
        pr: u64,
        /// SHA of the commit that conflicted.
        conflict: String,
    },

    /// Nothing was created for this target.
    Failed {
        /// Why the attempt failed.
        reason: String,
    },
}

impl AttemptOutcome {
    /// Returns the outcome as a string for logs and summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded { .. } => "succeeded",
            Self::DraftCreated { .. } => "draft",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns the created pull request number, if any.
    #[must_use]
    pub fn pull_request(&self) -> Option<u64> {
        match self {
            Self::Succeeded { pr } | Self::DraftCreated { pr, .. } => Some(*pr),
            Self::Failed { .. } => None,
        }
    }
}

/// One target branch's backport, from branch creation to terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct BackportAttempt {
    /// Target branch name.
    pub target: String,

    /// Backport branch name.
    pub branch: String,

    /// Commits that did not make it onto the backport branch, oldest first.
    pub remaining: Vec<String>,

    /// Terminal outcome.
    pub outcome: AttemptOutcome,
}

impl BackportAttempt {
    /// Returns true if a pull request (regular or draft) was created.
    #[must_use]
    pub fn created(&self) -> bool {
        self.outcome.pull_request().is_some()
    }
}

/// States of the replay state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngineState {
    Branching,
    Replaying,
    DraftPending,
    Succeeded,
    DraftCreated,
    Aborted,
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Branching => "branching",
            Self::Replaying => "replaying",
            Self::DraftPending => "draft_pending",
            Self::Succeeded => "succeeded",
            Self::DraftCreated => "draft_created",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        })
    }
}
