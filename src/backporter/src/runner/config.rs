//! Runner configuration.

use crate::config::BackportConfig;

/// Configuration for backporting one pull request.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository owner.
    owner: String,
    /// Repository name.
    repo: String,
    /// Source pull request number.
    pr_number: u64,
    /// Validated backport settings.
    backport: BackportConfig,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        pr_number: u64,
        backport: BackportConfig,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            pr_number,
            backport,
        }
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the source pull request number.
    pub fn pr_number(&self) -> u64 {
        self.pr_number
    }

    /// Returns the backport settings.
    pub fn backport(&self) -> &BackportConfig {
        &self.backport
    }
}
