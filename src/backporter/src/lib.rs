#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod cherry_pick;
pub mod commits;
pub mod config;
pub mod git;
pub mod host;
pub mod labels;
pub mod merge_kind;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod templates;

pub use cherry_pick::{AttemptOutcome, BackportAttempt, CherryPickEngine};
pub use commits::{
    filter_merge_commits, select_commits, CommitCache, FilterOutcome, SelectionError,
};
pub use config::{
    BackportConfig, BackportInputs, ConfigError, ConflictHandling, MergeCommitHandling,
};
pub use git::{GitError, GitWorkspace};
pub use host::{CodeHost, ErrorKind, FakeHost, GitHubHost, HostError, PullRequest};
pub use labels::{labels_to_copy, resolve_target_branches, TargetBranch};
pub use merge_kind::{resolve_merge_kind, MergeKind, MergeKindError};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{publish_summary, HaltReason, ReportError, RunSummary};
pub use templates::{
    backport_branch_name, create_handlebars_registry, manual_steps, replace_placeholders,
    TemplateError, TemplateRenderer,
};
