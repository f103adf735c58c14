//! Runner error types.

use crate::commits::SelectionError;
use crate::host::HostError;
use crate::merge_kind::MergeKindError;
use crate::summary::ReportError;
use crate::templates::TemplateError;

/// Errors that stop a backport run for every target.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// A code host call shared by every target failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The merge strategy could not be inferred.
    #[error(transparent)]
    MergeKind(#[from] MergeKindError),

    /// The pull request is merged but its merge strategy is unknown.
    #[error("could not determine how pull request #{number} was merged")]
    UnresolvedMergeKind {
        /// Pull request number.
        number: u64,
    },

    /// The commits to replay could not be selected.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A notice could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The final report could not be posted.
    #[error(transparent)]
    Report(#[from] ReportError),
}
