//! CLI for the backporter GitHub Action.
//!
//! Reads the action inputs and the workflow event from the environment,
//! backports the triggering pull request and prints a summary.

mod event;

use backporter::config::{
    DEFAULT_CONFLICT_HANDLING, DEFAULT_LABEL_PATTERN, DEFAULT_MERGE_COMMIT_HANDLING,
};
use backporter::{
    AttemptOutcome, BackportConfig, BackportInputs, ConfigError, GitWorkspace, RunSummary,
    Runner, RunnerConfig, RunnerError,
};
use clap::Parser;
use event::EventError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const TOKEN_ENV: &str = "INPUT_GITHUB_TOKEN";

/// Backporter - Replay merged pull requests onto the branches named by their labels.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub token used for every API call.
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, default_value = "", hide_default_value = true)]
    github_token: String,

    /// Committer name of replayed commits.
    #[arg(long, env = "INPUT_COMMITTER", default_value = "", hide_default_value = true)]
    committer: String,

    /// Committer email of replayed commits.
    #[arg(long, env = "INPUT_COMMITTER_EMAIL", default_value = "", hide_default_value = true)]
    committer_email: String,

    /// Backport pull request title.
    #[arg(long, env = "INPUT_PR_TITLE", default_value = "", hide_default_value = true)]
    pr_title: String,

    /// Backport pull request description.
    #[arg(long, env = "INPUT_PR_DESCRIPTION", default_value = "", hide_default_value = true)]
    pr_description: String,

    /// Label pattern; the first capturing group names the target branch.
    #[arg(long, env = "INPUT_LABEL_PATTERN", default_value = DEFAULT_LABEL_PATTERN)]
    label_pattern: String,

    /// Pattern of labels copied onto backport pull requests.
    #[arg(long, env = "INPUT_COPY_LABELS_PATTERN", default_value = "")]
    copy_labels_pattern: String,

    /// What to do on conflicts: abort or draft.
    #[arg(long, env = "INPUT_CONFLICT_HANDLING", default_value = DEFAULT_CONFLICT_HANDLING)]
    conflict_handling: String,

    /// What to do with merge commits: skip, abort, or include.
    #[arg(long, env = "INPUT_MERGE_COMMIT_HANDLING", default_value = DEFAULT_MERGE_COMMIT_HANDLING)]
    merge_commit_handling: String,

    /// Timeout of each git invocation, in seconds.
    #[arg(long, env = "INPUT_GIT_TIMEOUT_SECS", default_value_t = 5)]
    git_timeout_secs: u64,

    /// Repository in owner/repo form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Name of the triggering event.
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the event payload.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Checked out repository.
    #[arg(long, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,
}

impl Args {
    /// Moves the raw action inputs out of the arguments.
    fn take_inputs(&mut self) -> BackportInputs {
        BackportInputs {
            github_token: std::mem::take(&mut self.github_token),
            committer: self.committer.clone(),
            email: self.committer_email.clone(),
            title: self.pr_title.clone(),
            description: self.pr_description.clone(),
            copy_labels_pattern: self.copy_labels_pattern.clone(),
            label_pattern: self.label_pattern.clone(),
            conflict_handling: self.conflict_handling.clone(),
            merge_commit_handling: self.merge_commit_handling.clone(),
        }
    }
}

/// Errors that stop the CLI before or during a run.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let mut args = Args::parse();
    let inputs = args.take_inputs();

    // The environment is only modified while the process is single threaded.
    protect_token(&inputs.github_token);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            return ExitCode::from(2);
        }
    };

    // Run the main logic
    match runtime.block_on(run(args, inputs)) {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args, inputs: BackportInputs) -> Result<RunSummary, CliError> {
    let config = BackportConfig::from_inputs(inputs)?;
    let (owner, repo) = event::parse_repository(&args.repository)?;
    let pr_number = event::read_pull_request_number(&args.event_name, &args.event_path)?;
    info!(repository = %args.repository, pr = pr_number, "Backporting pull request");

    if let Some(workspace) = &args.workspace {
        let git = GitWorkspace::new(workspace)
            .with_timeout(Duration::from_secs(args.git_timeout_secs));
        if let Err(e) = git.configure(config.committer()).await {
            warn!(error = %e, "Failed to configure git");
        }
    }

    // Ignore error if already installed
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .ok();

    let runner = Runner::new(RunnerConfig::new(owner, repo, pr_number, config))?;
    Ok(runner.run().await?)
}

/// Masks the token in the workflow log and removes it from the environment,
/// so child processes never see it.
fn protect_token(token: &str) {
    if !token.is_empty() {
        println!("::add-mask::{token}");
    }
    std::env::remove_var(TOKEN_ENV);
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Pull request: #{}", summary.pr_number);
    if let Some(kind) = summary.merge_kind {
        println!("  Merge kind: {kind}");
    }
    if let Some(halt) = &summary.halt {
        println!("  Stopped: {halt}");
        return;
    }
    println!("  Commits: {}", summary.commits);
    println!("  Backports created: {}", summary.succeeded());
    println!("  Drafts created: {}", summary.drafts());
    println!("  Backports failed: {}", summary.failed());

    for attempt in &summary.attempts {
        match &attempt.outcome {
            AttemptOutcome::Succeeded { pr } => {
                println!("    {} -> #{pr}", attempt.target);
            }
            AttemptOutcome::DraftCreated { pr, conflict } => {
                println!("    {} -> #{pr} (draft, conflict at {conflict})", attempt.target);
            }
            AttemptOutcome::Failed { reason } => {
                println!("    {} -> failed: {reason}", attempt.target);
            }
        }
    }
}
