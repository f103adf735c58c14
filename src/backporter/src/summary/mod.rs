//! Run summary types and reporting.

mod error;
mod halt;
mod run_summary;

pub use error::ReportError;
pub use halt::HaltReason;
pub use run_summary::RunSummary;

use crate::host::CodeHost;
use crate::templates::TemplateRenderer;
use tracing::info;

/// Posts the final comment for a run on the source pull request.
///
/// Lists every created pull request and every failed target, or posts a
/// "nothing created" notice when no target produced a pull request.
///
/// # Errors
///
/// Returns [`ReportError`] when the comment cannot be rendered or posted.
pub async fn publish_summary(
    host: &dyn CodeHost,
    renderer: &TemplateRenderer,
    summary: &RunSummary,
) -> Result<(), ReportError> {
    let failed = summary.failed_entries();
    let body = if summary.created() == 0 {
        renderer.render_nothing_created(&failed)?
    } else {
        renderer.render_summary(&summary.created_entries(), &failed)?
    };

    host.create_comment(summary.pr_number, &body)
        .await
        .map_err(ReportError::Comment)?;
    info!(
        pr = summary.pr_number,
        created = summary.created(),
        failed = summary.failed(),
        "Posted backport summary"
    );
    Ok(())
}
