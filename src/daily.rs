//! The daily driver: every operation in sequence, one summary at the end.
//!
//! Steps are independent. A fatal error in one step is recorded and the
//! driver moves on to the next.

use crate::config::SyncConfig;
use crate::mirror::{
    domain::SyncReport,
    ports::{IssueTracker, PullRequestSource, TaskStore},
    services::{IssueToTaskSync, PullRequestMirror, TaskToIssueSync},
};
use crate::workload::{
    domain::{Capacity, Roster},
    services::{AssignmentReport, AssignmentService},
};
use chrono::{DateTime, Duration, Utc};
use minijinja::Environment;
use mockable::Clock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

const SUMMARY_TEMPLATE: &str = "daily sync started {{ started_at }}\n\
{% for step in steps %}{{ step.name }}: {% if step.fatal %}failed: {{ step.fatal }}{% else %}{{ step.counts }}{% endif %}\n\
{% for failure in step.errors %}  {{ failure }}\n{% endfor %}{% endfor %}";

/// Step name of the task → issue operation.
pub const TASK_TO_ISSUE: &str = "task-to-issue";
/// Step name of the issue → task operation.
pub const ISSUE_TO_TASK: &str = "issue-to-task";
/// Step name of the pull request operation.
pub const PR_SYNC: &str = "pr-sync";
/// Step name of the assignment operation.
pub const ASSIGN_TASKS: &str = "assign-tasks";

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "report", rename_all = "snake_case")]
pub enum StepOutcome {
    /// A mirror operation finished its batch.
    Synced(SyncReport),
    /// The assignment operation finished its batch.
    Assigned(AssignmentReport),
    /// The step stopped before its batch.
    Fatal(String),
}

impl StepOutcome {
    fn failures(&self) -> Vec<String> {
        match self {
            Self::Synced(report) => report.errors().iter().map(ToString::to_string).collect(),
            Self::Assigned(report) => report.errors().iter().map(ToString::to_string).collect(),
            Self::Fatal(_) => Vec::new(),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced(report) => fmt::Display::fmt(report, f),
            Self::Assigned(report) => fmt::Display::fmt(report, f),
            Self::Fatal(message) => write!(f, "failed: {message}"),
        }
    }
}

/// One named step and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Step name.
    pub name: &'static str,
    /// Outcome.
    pub outcome: StepOutcome,
}

#[derive(Serialize)]
struct StepView<'a> {
    name: &'a str,
    counts: String,
    fatal: Option<&'a str>,
    errors: Vec<String>,
}

/// Everything one daily run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    started_at: DateTime<Utc>,
    steps: Vec<StepRecord>,
}

impl RunSummary {
    /// Starts an empty summary.
    #[must_use]
    pub const fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            steps: Vec::new(),
        }
    }

    /// Appends a step outcome and logs it.
    pub fn record(&mut self, name: &'static str, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Fatal(message) => error!(step = name, error = %message, "step failed"),
            other => info!(step = name, summary = %other, "step finished"),
        }
        self.steps.push(StepRecord { name, outcome });
    }

    /// Returns the recorded steps in run order.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Returns `true` when any step failed before its batch.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step.outcome, StepOutcome::Fatal(_)))
    }

    /// Renders the human summary.
    ///
    /// # Errors
    ///
    /// Returns a [`minijinja::Error`] if the template fails to render.
    pub fn render(&self) -> Result<String, minijinja::Error> {
        let steps: Vec<StepView<'_>> = self
            .steps
            .iter()
            .map(|step| StepView {
                name: step.name,
                counts: step.outcome.to_string(),
                fatal: match &step.outcome {
                    StepOutcome::Fatal(message) => Some(message.as_str()),
                    StepOutcome::Synced(_) | StepOutcome::Assigned(_) => None,
                },
                errors: step.outcome.failures(),
            })
            .collect();
        Environment::new().render_str(
            SUMMARY_TEMPLATE,
            minijinja::context! {
                started_at => self.started_at.to_rfc3339(),
                steps => steps,
            },
        )
    }
}

fn mirror_outcome<E: fmt::Display>(result: Result<SyncReport, E>) -> StepOutcome {
    match result {
        Ok(report) => StepOutcome::Synced(report),
        Err(err) => StepOutcome::Fatal(err.to_string()),
    }
}

/// Runs all four operations against one set of ports.
pub struct DailySync<S, T, P, C> {
    store: Arc<S>,
    tracker: Arc<T>,
    pulls: Result<Arc<P>, String>,
    clock: Arc<C>,
    team: Option<crate::mirror::domain::TeamId>,
    roster: Roster,
    capacity: Capacity,
    recent_window: Duration,
}

impl<S, T, P, C> DailySync<S, T, P, C>
where
    S: TaskStore,
    T: IssueTracker,
    P: PullRequestSource,
    C: Clock + Send + Sync,
{
    /// Creates the driver with defaults and no pull request source.
    #[must_use]
    pub fn new(store: Arc<S>, tracker: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            store,
            tracker,
            pulls: Err("pull request source not configured".to_owned()),
            clock,
            team: None,
            roster: Roster::default(),
            capacity: Capacity::default(),
            recent_window: Duration::days(crate::mirror::services::DEFAULT_RECENT_DAYS),
        }
    }

    /// Takes team, roster, capacity, and window from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &SyncConfig) -> Self {
        self.team = config.linear_team().cloned();
        self.roster = config.roster().clone();
        self.capacity = config.capacity();
        self.recent_window = config.recent_window();
        self
    }

    /// Supplies the pull request source.
    #[must_use]
    pub fn with_pull_requests(mut self, pulls: Arc<P>) -> Self {
        self.pulls = Ok(pulls);
        self
    }

    /// Records why the pull request step cannot run.
    #[must_use]
    pub fn without_pull_requests(mut self, reason: impl fmt::Display) -> Self {
        self.pulls = Err(reason.to_string());
        self
    }

    /// Runs task → issue, issue → task, pull requests, then assignment.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::new(self.clock.utc());
        info!("daily sync started");

        let forward = TaskToIssueSync::new(Arc::clone(&self.store), Arc::clone(&self.tracker))
            .with_team(self.team.clone())
            .run()
            .await;
        summary.record(TASK_TO_ISSUE, mirror_outcome(forward));

        let backward = IssueToTaskSync::new(Arc::clone(&self.store), Arc::clone(&self.tracker))
            .run()
            .await;
        summary.record(ISSUE_TO_TASK, mirror_outcome(backward));

        let pulls = match &self.pulls {
            Ok(pulls) => {
                let result = PullRequestMirror::new(
                    Arc::clone(&self.store),
                    Arc::clone(&self.tracker),
                    Arc::clone(pulls),
                    Arc::clone(&self.clock),
                )
                .with_recent_window(self.recent_window)
                .with_team(self.team.clone())
                .run()
                .await;
                mirror_outcome(result)
            }
            Err(reason) => StepOutcome::Fatal(reason.clone()),
        };
        summary.record(PR_SYNC, pulls);

        let assignment = AssignmentService::new(Arc::clone(&self.store), Arc::clone(&self.tracker))
            .with_roster(self.roster.clone())
            .with_capacity(self.capacity)
            .run()
            .await;
        let outcome = match assignment {
            Ok(report) => StepOutcome::Assigned(report),
            Err(err) => StepOutcome::Fatal(err.to_string()),
        };
        summary.record(ASSIGN_TASKS, outcome);

        info!(fatal = summary.has_fatal(), "daily sync finished");
        summary
    }
}
