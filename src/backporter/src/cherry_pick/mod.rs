//! Commit replay onto a single target branch.
//!
//! [`CherryPickEngine::backport`] drives one target through
//! `Branching -> Replaying -> {Succeeded | DraftPending -> DraftCreated | Aborted}`.
//! Commits are written through the code host's commit API, one per source
//! commit, each parented on the previous replayed commit. Any failure after
//! the backport branch exists deletes it again, so a target ends with either
//! a branch and a pull request, or nothing.

mod attempt;

pub use attempt::{AttemptOutcome, BackportAttempt};

use crate::config::{BackportConfig, ConflictHandling};
use crate::host::{CodeHost, CommitRecord, HostError, NewCommit, NewPullRequest, PullRequest};
use crate::labels::TargetBranch;
use crate::templates::{backport_branch_name, manual_steps, replace_placeholders, TemplateRenderer};
use attempt::EngineState;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Replays a fixed list of commits onto target branches.
pub struct CherryPickEngine<'a> {
    host: &'a dyn CodeHost,
    renderer: &'a TemplateRenderer,
    config: &'a BackportConfig,
    pr: &'a PullRequest,
    commits: &'a [CommitRecord],
    labels: &'a [String],
}

impl<'a> CherryPickEngine<'a> {
    /// Creates an engine replaying `commits` of `pr`.
    ///
    /// `labels` are added to every pull request the engine opens.
    pub fn new(
        host: &'a dyn CodeHost,
        renderer: &'a TemplateRenderer,
        config: &'a BackportConfig,
        pr: &'a PullRequest,
        commits: &'a [CommitRecord],
        labels: &'a [String],
    ) -> Self {
        Self {
            host,
            renderer,
            config,
            pr,
            commits,
            labels,
        }
    }

    /// Backports to `target` and returns the terminal attempt.
    ///
    /// Never fails: every error is folded into [`AttemptOutcome::Failed`] so
    /// the remaining targets are still processed.
    pub async fn backport(&self, target: &TargetBranch) -> BackportAttempt {
        let branch = backport_branch_name(self.pr.number, &target.name);
        let span = info_span!(
            "backport",
            pr = self.pr.number,
            target = %target.name,
            branch = %branch
        );

        async {
            let (remaining, outcome) = self.run(target, &branch).await;
            info!(outcome = outcome.as_str(), "Backport finished");
            BackportAttempt {
                target: target.name.clone(),
                branch: branch.clone(),
                remaining,
                outcome,
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, target: &TargetBranch, branch: &str) -> (Vec<String>, AttemptOutcome) {
        transition(EngineState::Branching);
        if let Err(e) = self.host.create_branch(branch, &target.sha).await {
            error!(error = %e, "Failed to create backport branch");
            transition(EngineState::Failed);
            return (
                self.shas_from(0),
                failed(format!("failed to create branch `{branch}`: {e}")),
            );
        }

        transition(EngineState::Replaying);
        let mut tip = target.sha.clone();
        for (index, commit) in self.commits.iter().enumerate() {
            match self.host.create_commit(&self.replayed_commit(commit, &tip)).await {
                Ok(created) => {
                    debug!(sha = %commit.sha, replayed = %created.sha, "Replayed commit");
                    tip = created.sha;
                }
                Err(e) if e.is_conflict() => {
                    warn!(sha = %commit.sha, "Conflict while replaying commit");
                    let outcome = match self.config.conflict_handling() {
                        ConflictHandling::Abort => {
                            self.abort_on_conflict(target, branch, commit).await
                        }
                        ConflictHandling::Draft => {
                            self.draft_on_conflict(target, branch, index, &tip).await
                        }
                    };
                    return (self.shas_from(index), outcome);
                }
                Err(e) => {
                    error!(sha = %commit.sha, error = %e, "Failed to replay commit");
                    self.delete_branch(branch).await;
                    transition(EngineState::Failed);
                    return (
                        self.shas_from(index),
                        failed(format!("failed to replay commit {}: {e}", commit.sha)),
                    );
                }
            }
        }

        match self.open_pull_request(target, branch, &tip, false).await {
            Ok(number) => {
                transition(EngineState::Succeeded);
                (Vec::new(), AttemptOutcome::Succeeded { pr: number })
            }
            Err(e) => {
                error!(error = %e, "Failed to open backport pull request");
                self.delete_branch(branch).await;
                transition(EngineState::Failed);
                (
                    Vec::new(),
                    failed(format!("failed to open pull request from `{branch}`: {e}")),
                )
            }
        }
    }

    async fn abort_on_conflict(
        &self,
        target: &TargetBranch,
        branch: &str,
        commit: &CommitRecord,
    ) -> AttemptOutcome {
        self.delete_branch(branch).await;
        match self.renderer.render_conflict_abort(&commit.sha, &target.name) {
            Ok(body) => self.comment(self.pr.number, &body).await,
            Err(e) => error!(error = %e, "Failed to render conflict comment"),
        }
        transition(EngineState::Aborted);
        failed(format!("conflict while replaying commit {}", commit.sha))
    }

    async fn draft_on_conflict(
        &self,
        target: &TargetBranch,
        branch: &str,
        index: usize,
        tip: &str,
    ) -> AttemptOutcome {
        transition(EngineState::DraftPending);
        let conflict = &self.commits[index];
        let empty_base = index == 0;

        let base = if empty_base {
            match self.empty_base_commit(target).await {
                Ok(sha) => sha,
                Err(e) => {
                    error!(error = %e, "Failed to create empty base commit");
                    self.delete_branch(branch).await;
                    transition(EngineState::Failed);
                    return failed(format!("failed to create draft base on `{branch}`: {e}"));
                }
            }
        } else {
            tip.to_string()
        };

        let number = match self.open_pull_request(target, branch, &base, true).await {
            Ok(number) => number,
            Err(e) => {
                error!(error = %e, "Failed to open draft pull request");
                self.delete_branch(branch).await;
                transition(EngineState::Failed);
                return failed(format!("failed to open draft pull request from `{branch}`: {e}"));
            }
        };

        let steps = manual_steps(branch, &self.shas_from(index), empty_base);
        match self
            .renderer
            .render_conflict_draft(&conflict.sha, &target.name, number, &steps)
        {
            Ok(body) => {
                self.comment(self.pr.number, &body).await;
                self.comment(number, &body).await;
            }
            Err(e) => error!(error = %e, "Failed to render conflict comment"),
        }

        transition(EngineState::DraftCreated);
        AttemptOutcome::DraftCreated {
            pr: number,
            conflict: conflict.sha.clone(),
        }
    }

    /// Writes a commit with the target tip's tree on top of the tip.
    async fn empty_base_commit(&self, target: &TargetBranch) -> Result<String, HostError> {
        let tip = self.host.get_commit(&target.sha).await?;
        let commit = NewCommit {
            message: format!(
                "Backport of #{} to {} needs manual conflict resolution",
                self.pr.number, target.name
            ),
            tree_sha: tip.tree_sha,
            parents: vec![target.sha.clone()],
            author: None,
            committer: Some(self.config.committer().clone()),
        };
        Ok(self.host.create_commit(&commit).await?.sha)
    }

    /// Moves the branch to `head`, opens the pull request and labels it.
    async fn open_pull_request(
        &self,
        target: &TargetBranch,
        branch: &str,
        head: &str,
        draft: bool,
    ) -> Result<u64, HostError> {
        self.host.update_branch(branch, head, false).await?;

        let request = NewPullRequest {
            title: replace_placeholders(self.config.title(), &target.name, self.pr),
            body: replace_placeholders(self.config.description(), &target.name, self.pr),
            head: branch.to_string(),
            base: target.name.clone(),
            draft,
            maintainer_can_modify: true,
        };
        let created = self.host.create_pull_request(&request).await?;
        info!(number = created.number, draft, "Opened backport pull request");

        if !self.labels.is_empty() {
            if let Err(e) = self.host.add_labels(created.number, self.labels).await {
                warn!(number = created.number, error = %e, "Failed to copy labels");
            }
        }
        Ok(created.number)
    }

    /// Builds the replayed form of `commit` on top of `parent`.
    ///
    /// Merge commits keep their parents and gain `parent` as the last one.
    fn replayed_commit(&self, commit: &CommitRecord, parent: &str) -> NewCommit {
        let parents = if commit.is_merge() {
            let mut parents = commit.parents.clone();
            parents.push(parent.to_string());
            parents
        } else {
            vec![parent.to_string()]
        };
        NewCommit {
            message: commit.message.clone(),
            tree_sha: commit.tree_sha.clone(),
            parents,
            author: commit.author.clone(),
            committer: Some(self.config.committer().clone()),
        }
    }

    async fn delete_branch(&self, branch: &str) {
        if let Err(e) = self.host.delete_branch(branch).await {
            error!(error = %e, "Failed to delete backport branch");
        }
    }

    async fn comment(&self, number: u64, body: &str) {
        if let Err(e) = self.host.create_comment(number, body).await {
            error!(number, error = %e, "Failed to post comment");
        }
    }

    fn shas_from(&self, index: usize) -> Vec<String> {
        self.commits[index..].iter().map(|c| c.sha.clone()).collect()
    }
}

fn transition(state: EngineState) {
    debug!(%state, "Backport state");
}

fn failed(reason: String) -> AttemptOutcome {
    AttemptOutcome::Failed { reason }
}
