//! Orchestrates a backport run for one pull request.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::cherry_pick::CherryPickEngine;
use crate::commits::{filter_merge_commits, select_commits, CommitCache, FilterOutcome};
use crate::host::{CodeHost, GitHubHost};
use crate::labels::{labels_to_copy, resolve_target_branches};
use crate::merge_kind::{resolve_merge_kind, MergeKind};
use crate::summary::{publish_summary, HaltReason, RunSummary};
use crate::templates::TemplateRenderer;
use tracing::{info, info_span, warn, Instrument};

/// Orchestrates a full backport run.
pub struct Runner<H = GitHubHost> {
    config: RunnerConfig,
    host: H,
    renderer: TemplateRenderer,
}

impl Runner<GitHubHost> {
    /// Builds a runner talking to GitHub.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let host = GitHubHost::from_token(
            config.backport().github_token(),
            config.owner(),
            config.repo(),
        )?;
        Ok(Self::with_host(config, host))
    }
}

impl<H: CodeHost> Runner<H> {
    /// Builds a runner on top of an existing code host.
    pub fn with_host(config: RunnerConfig, host: H) -> Self {
        Self {
            config,
            host,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Returns the code host the runner talks to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Executes the full orchestration flow.
    ///
    /// Targets are processed one after another. A failing target never stops
    /// the others; only errors shared by every target end the run early.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the pull request cannot be read, its merge
    /// strategy cannot be inferred, its commits cannot be selected, or a
    /// run-level comment cannot be posted.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let number = self.config.pr_number();
        let span = info_span!("run", pr = number);
        self.run_inner(number).instrument(span).await
    }

    async fn run_inner(&self, number: u64) -> Result<RunSummary, RunnerError> {
        let host: &dyn CodeHost = &self.host;
        let backport = self.config.backport();

        let pr = host.get_pull_request(number).await?;
        if !pr.merged {
            warn!("Pull request is not merged, skipping backport");
            host.create_comment(number, &self.renderer.render_not_merged()?)
                .await?;
            return Ok(RunSummary::halted(number, HaltReason::NotMerged));
        }

        let targets = resolve_target_branches(host, &pr.labels, backport.label_pattern()).await;
        if targets.is_empty() {
            info!("No target branches found");
            return Ok(RunSummary::halted(number, HaltReason::NoTargets));
        }
        info!(count = targets.len(), "Found target branches");

        let kind = resolve_merge_kind(host, &pr).await?;
        if kind == MergeKind::Invalid {
            return Err(RunnerError::UnresolvedMergeKind { number });
        }
        info!(%kind, "Resolved merge kind");

        let mut cache = CommitCache::new();
        let selected = select_commits(host, &mut cache, &pr, kind).await?;

        let commits = match filter_merge_commits(selected, backport.merge_commit_handling()) {
            FilterOutcome::Commits(commits) => commits,
            FilterOutcome::Aborted { merge_commit } => {
                warn!(sha = %merge_commit, "Found merge commit, aborting backport");
                let body = self.renderer.render_merge_commit_abort(&merge_commit, number)?;
                host.create_comment(number, &body).await?;
                let mut summary =
                    RunSummary::halted(number, HaltReason::MergeCommitAbort { sha: merge_commit });
                summary.merge_kind = Some(kind);
                return Ok(summary);
            }
        };

        let mut summary = RunSummary::new(number);
        summary.merge_kind = Some(kind);
        summary.commits = commits.len();

        if commits.is_empty() {
            info!("No commits to cherry-pick");
            host.create_comment(number, &self.renderer.render_no_commits()?)
                .await?;
            summary.halt = Some(HaltReason::NothingToBackport);
            return Ok(summary);
        }

        let labels = labels_to_copy(
            &pr.labels,
            backport.label_pattern(),
            backport.copy_labels_pattern(),
        );
        let engine = CherryPickEngine::new(host, &self.renderer, backport, &pr, &commits, &labels);
        for target in &targets {
            summary.record(engine.backport(target).await);
        }

        publish_summary(host, &self.renderer, &summary).await?;
        Ok(summary)
    }
}
