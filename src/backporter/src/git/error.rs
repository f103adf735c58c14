//! Git error types.

use crate::host::ErrorKind;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// git could not be started.
    #[error("Failed to execute git {op}: {source}")]
    Spawn {
        /// The git subcommand.
        op: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// git exited unsuccessfully.
    #[error(
        "git {op} failed with exit code {}: {stderr}",
        .status.map_or_else(|| "none".to_string(), |s| s.to_string())
    )]
    Failed {
        /// The git subcommand.
        op: String,
        /// Exit code, absent when killed by a signal.
        status: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// git did not finish in time.
    #[error("git {op} timed out after {}s", .after.as_secs())]
    TimedOut {
        /// The git subcommand.
        op: String,
        /// The timeout that elapsed.
        after: Duration,
    },
}

impl GitError {
    /// Classifies the error. Exit code 1 from `cherry-pick` is a conflict.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Failed { op, status: Some(1), .. } if op == "cherry-pick" => ErrorKind::Conflict,
            Self::TimedOut { .. } => ErrorKind::Transient,
            _ => ErrorKind::Other,
        }
    }

    /// Returns true if the error is a cherry-pick conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}
