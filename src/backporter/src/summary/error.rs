//! Reporting error types.

use crate::host::HostError;
use crate::templates::TemplateError;

/// Errors raised while reporting a run's outcome.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The comment could not be rendered.
    #[error(transparent)]
    Render(#[from] TemplateError),

    /// The comment could not be posted.
    #[error("failed to post summary comment: {0}")]
    Comment(#[source] HostError),
}
