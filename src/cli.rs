//! Shared plumbing for the standalone entry points.
//!
//! Each binary parses [`EntryArgs`], then hands its [`Operation`] to
//! [`run`]. A fatal error exits with status 1; a finished batch exits with
//! status 0 even when some items failed.

use crate::config::{ConfigError, SyncConfig};
use crate::daily::DailySync;
use crate::journal;
use crate::mirror::{
    adapters::{github::GitHubPullRequests, linear::LinearIssueTracker, notion::NotionTaskStore},
    ports::RemoteError,
    services::{IssueToTaskSync, MirrorError, PullRequestMirror, TaskToIssueSync},
};
use crate::workload::services::{AssignmentError, AssignmentService};
use clap::Parser;
use mockable::DefaultClock;
use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Arguments accepted by every entry point.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct EntryArgs {
    /// Issue tracker API key; overrides `LINEAR_API_KEY`.
    pub api_key: Option<String>,
}

/// The operation an entry point performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Task store → issue tracker.
    TaskToIssue,
    /// Issue tracker → task store.
    IssueToTask,
    /// Pull requests → task store.
    PullRequestSync,
    /// Workload balancing.
    AssignTasks,
    /// All four, in sequence.
    DailySync,
}

impl Operation {
    /// Returns the name used for the run log file.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::TaskToIssue => "task-to-issue",
            Self::IssueToTask => "issue-to-task",
            Self::PullRequestSync => "pr-sync",
            Self::AssignTasks => "task-manager",
            Self::DailySync => "daily-sync",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_name())
    }
}

/// Errors that stop an operation before its batch.
#[derive(Debug, Error)]
pub enum FatalError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A client could not be built.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A mirror operation failed before its batch.
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    /// The assignment operation failed before its batch.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// The summary could not be rendered.
    #[error("failed to render run summary: {0}")]
    Render(#[from] minijinja::Error),

    /// At least one daily step failed before its batch.
    #[error("daily sync finished with failed steps")]
    StepsFailed,
}

fn emit(stream: &mut dyn Write, text: &str) {
    if let Err(err) = writeln!(stream, "{text}") {
        warn!(error = %err, "failed to write output");
    }
}

/// Parses arguments, sets up logging, runs `operation`, and writes its
/// summary to stdout.
pub async fn run(operation: Operation) -> ExitCode {
    let args = EntryArgs::parse();
    let config = match SyncConfig::from_env() {
        Ok(config) => config.with_linear_token(args.api_key),
        Err(err) => {
            emit(&mut io::stderr().lock(), &format!("error: {err}"));
            return ExitCode::FAILURE;
        }
    };
    match journal::init(config.log_dir(), operation.log_name(), journal::log_day(&DefaultClock)) {
        Ok(path) => info!(%operation, log = %path, "run started"),
        Err(err) => emit(&mut io::stderr().lock(), &format!("warning: {err}")),
    }

    let (summary, outcome) = match execute(operation, &config).await {
        Ok(summary) => (summary, Ok(())),
        Err((summary, err)) => (summary, Err(err)),
    };
    if let Some(text) = summary {
        emit(&mut io::stdout().lock(), text.trim_end());
    }
    match outcome {
        Ok(()) => {
            info!(%operation, "run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%operation, error = %err, "run failed");
            emit(&mut io::stderr().lock(), &format!("error: {err}"));
            ExitCode::FAILURE
        }
    }
}

type Execution = Result<Option<String>, (Option<String>, FatalError)>;

fn fatal(err: impl Into<FatalError>) -> (Option<String>, FatalError) {
    (None, err.into())
}

/// Builds the adapters `operation` needs and runs it.
async fn execute(operation: Operation, config: &SyncConfig) -> Execution {
    let clock = Arc::new(DefaultClock);
    let store = || -> Result<Arc<NotionTaskStore>, FatalError> {
        Ok(Arc::new(NotionTaskStore::new(config.notion()?)?))
    };
    let tracker = || -> Result<Arc<LinearIssueTracker>, FatalError> {
        Ok(Arc::new(LinearIssueTracker::new(config.linear()?)?))
    };
    let pulls = || -> Result<Arc<GitHubPullRequests>, FatalError> {
        Ok(Arc::new(GitHubPullRequests::new(config.github()?)?))
    };
    let team = config.linear_team().cloned();

    let text = match operation {
        Operation::TaskToIssue => {
            let sync = TaskToIssueSync::new(store().map_err(fatal)?, tracker().map_err(fatal)?);
            sync.with_team(team).run().await.map_err(fatal)?.to_string()
        }
        Operation::IssueToTask => {
            let sync = IssueToTaskSync::new(store().map_err(fatal)?, tracker().map_err(fatal)?);
            sync.run().await.map_err(fatal)?.to_string()
        }
        Operation::PullRequestSync => {
            let mirror = PullRequestMirror::new(
                store().map_err(fatal)?,
                tracker().map_err(fatal)?,
                pulls().map_err(fatal)?,
                clock,
            )
            .with_recent_window(config.recent_window())
            .with_team(team);
            mirror.run().await.map_err(fatal)?.to_string()
        }
        Operation::AssignTasks => {
            let service =
                AssignmentService::new(store().map_err(fatal)?, tracker().map_err(fatal)?)
                    .with_roster(config.roster().clone())
                    .with_capacity(config.capacity());
            service.run().await.map_err(fatal)?.to_string()
        }
        Operation::DailySync => {
            let base = DailySync::new(store().map_err(fatal)?, tracker().map_err(fatal)?, clock)
                .with_config(config);
            let driver = match pulls() {
                Ok(source) => base.with_pull_requests(source),
                Err(err) => base.without_pull_requests(err),
            };
            let summary = driver.run().await;
            let rendered = summary.render().map_err(fatal)?;
            if summary.has_fatal() {
                return Err((Some(rendered), FatalError::StepsFailed));
            }
            rendered
        }
    };
    Ok(Some(text))
}
