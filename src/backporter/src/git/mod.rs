//! Local git working tree operations.
//!
//! Every call runs `git` in the workspace with a bounded timeout, so a
//! credential prompt or a stalled connection cannot hang the run.

mod error;

pub use error::GitError;

use crate::host::Signature;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default timeout for a single git invocation.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Message of the commit that records an unresolved cherry-pick.
pub const CONFLICT_COMMIT_MESSAGE: &str = "Backport commit with conflicts, needs manual resolution";

/// A git working tree.
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    workdir: PathBuf,
    timeout: Duration,
}

impl GitWorkspace {
    /// Creates a workspace rooted at `workdir` with the default timeout.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    /// Sets the per-invocation timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the working tree path.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Prepares git for the run: marks the workspace safe, silences merge
    /// conflict advice and sets the committer identity globally.
    ///
    /// # Errors
    ///
    /// Returns the first failing `git config` call.
    pub async fn configure(&self, committer: &Signature) -> Result<(), GitError> {
        let workdir = self.workdir.to_string_lossy().into_owned();
        info!(workspace = %workdir, "Configuring git");
        self.run(&["config", "--global", "--add", "safe.directory", &workdir])
            .await?;
        self.run(&["config", "--global", "advice.mergeConflict", "false"])
            .await?;
        self.run(&["config", "--global", "user.name", &committer.name])
            .await?;
        self.run(&["config", "--global", "user.email", &committer.email])
            .await?;
        Ok(())
    }

    /// Fetches `reference` from origin with the given history depth.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or times out.
    pub async fn fetch(&self, reference: &str, depth: u32) -> Result<(), GitError> {
        let depth = depth.to_string();
        self.run(&["fetch", "--depth", &depth, "origin", reference])
            .await
            .map(drop)
    }

    /// Creates `branch` at `start_point` and switches to it.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or times out.
    pub async fn switch_create(&self, branch: &str, start_point: &str) -> Result<(), GitError> {
        self.run(&["switch", "--create", branch, start_point])
            .await
            .map(drop)
    }

    /// Returns true if `origin/<branch>` exists locally.
    pub async fn branch_exists(&self, branch: &str) -> bool {
        let reference = format!("refs/remotes/origin/{branch}");
        match self
            .run(&["show-ref", "--verify", "--quiet", &reference])
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!(branch, error = %e, "Remote branch not found");
                false
            }
        }
    }

    /// Cherry-picks `commits` onto the current branch, recording their origin.
    ///
    /// Commits that become empty are dropped. On a conflict with
    /// `commit_on_conflict`, the conflicted state is committed as is and the
    /// sequence is left; otherwise the cherry-pick is aborted. Either way a
    /// conflict is returned as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or times out; see [`GitError::kind`].
    pub async fn cherry_pick(
        &self,
        commits: &[String],
        commit_on_conflict: bool,
    ) -> Result<(), GitError> {
        let mut args = vec!["cherry-pick", "--empty=drop", "--allow-empty", "-x"];
        args.extend(commits.iter().map(String::as_str));
        info!(count = commits.len(), "Cherry-picking commits");

        let Err(e) = self.run(&args).await else {
            return Ok(());
        };

        if e.is_conflict() && commit_on_conflict {
            warn!(error = %e, "Conflict while cherry-picking, committing conflicted state");
            self.run(&["commit", "--all", "--message", CONFLICT_COMMIT_MESSAGE])
                .await?;
            if let Err(quit) = self.run(&["cherry-pick", "--quit"]).await {
                warn!(error = %quit, "Failed to leave cherry-pick sequence");
            }
        } else if let Err(abort) = self.run(&["cherry-pick", "--abort"]).await {
            warn!(error = %abort, "Failed to abort cherry-pick");
        }
        Err(e)
    }

    /// Pushes `branch` to origin and sets it as upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or times out.
    pub async fn push(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["push", "--set-upstream", "origin", branch])
            .await
            .map(drop)
    }

    /// Lists the commits in `range` (e.g. `base..head`), oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or times out.
    pub async fn commit_range(&self, range: &str) -> Result<Vec<String>, GitError> {
        let output = self.run(&["rev-list", "--reverse", range]).await?;
        Ok(output.split_whitespace().map(str::to_string).collect())
    }

    /// Runs git and returns its standard output.
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let op = args.first().copied().unwrap_or_default().to_string();
        debug!(args = ?args, "Running git");

        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|source| GitError::Spawn {
                op: op.clone(),
                source,
            })?,
            Err(_) => {
                return Err(GitError::TimedOut {
                    op,
                    after: self.timeout,
                })
            }
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(GitError::Failed {
                op,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
