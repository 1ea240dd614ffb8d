//! Task store → issue tracker mirroring.

use super::{MirrorResult, MirrorDirection, Reconciler, select_team};
use crate::mirror::{
    domain::{
        DesiredIssueFields, IssueDraft, IssueLink, IssuePatch, IssueRecord, LinkIndex, SyncReport,
        TaskPatch, TaskRecord, Team, TeamId, WorkflowState, back_reference_line,
    },
    ports::{IssueScope, IssueTracker, RemoteResult, TaskStore},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Mirrors tasks into one team's issues.
pub struct TaskToIssue<S, T> {
    store: Arc<S>,
    tracker: Arc<T>,
    team: Team,
    states: Vec<WorkflowState>,
}

impl<S, T> TaskToIssue<S, T>
where
    S: TaskStore,
    T: IssueTracker,
{
    /// Creates the direction for `team` with its workflow catalogue.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        tracker: Arc<T>,
        team: Team,
        states: Vec<WorkflowState>,
    ) -> Self {
        Self {
            store,
            tracker,
            team,
            states,
        }
    }

    fn description(task: &TaskRecord) -> String {
        let back_reference = back_reference_line(task.id());
        match task.details() {
            Some(details) => format!("{details}\n\n{back_reference}"),
            None => back_reference,
        }
    }
}

#[async_trait]
impl<S, T> MirrorDirection for TaskToIssue<S, T>
where
    S: TaskStore,
    T: IssueTracker,
{
    type Source = TaskRecord;
    type Target = IssueRecord;

    fn record_label(&self, source: &TaskRecord) -> String {
        source.id().to_string()
    }

    fn title<'a>(&self, source: &'a TaskRecord) -> &'a str {
        source.title()
    }

    fn needs_update(&self, target: &IssueRecord, source: &TaskRecord) -> bool {
        DesiredIssueFields::from_task(source).is_stale(target, &self.states)
    }

    async fn create(&self, source: &TaskRecord) -> RemoteResult<IssueRecord> {
        let desired = DesiredIssueFields::from_task(source);
        let mut draft = IssueDraft::new(self.team.id().clone(), source.title());
        draft.description = Some(Self::description(source));
        draft.state_id = desired
            .target_state(&self.states)
            .map(|state| state.id().clone());
        draft.priority = desired.priority();
        draft.due_date = desired.due_date();
        self.tracker.create_issue(&draft).await
    }

    async fn update(&self, target: &IssueRecord, source: &TaskRecord) -> RemoteResult<()> {
        let desired = DesiredIssueFields::from_task(source);
        let mut patch = IssuePatch::new()
            .with_priority(desired.priority())
            .with_due_date(desired.due_date());
        match desired.target_state(&self.states) {
            Some(state) => patch = patch.with_state(state.id().clone()),
            None => warn!(
                issue_key = %target.key(),
                state = desired.state_name(),
                "team has no matching or backlog state; leaving state unchanged"
            ),
        }
        self.tracker.update_issue(target.id(), &patch).await
    }

    async fn after_create(&self, source: &TaskRecord, target: &IssueRecord) -> RemoteResult<()> {
        let link = IssueLink::new(target.key().clone(), target.url().map(str::to_owned));
        info!(task_id = %source.id(), issue_key = %target.key(), "linking task to new issue");
        self.store
            .update_task(source.id(), &TaskPatch::new().with_issue_link(link))
            .await
    }
}

/// Runs the task store → issue tracker operation.
pub struct TaskToIssueSync<S, T> {
    store: Arc<S>,
    tracker: Arc<T>,
    team: Option<TeamId>,
}

impl<S, T> TaskToIssueSync<S, T>
where
    S: TaskStore,
    T: IssueTracker,
{
    /// Creates the operation; the first listed team is used unless
    /// [`Self::with_team`] picks one.
    #[must_use]
    pub const fn new(store: Arc<S>, tracker: Arc<T>) -> Self {
        Self {
            store,
            tracker,
            team: None,
        }
    }

    /// Mirrors into the given team.
    #[must_use]
    pub fn with_team(mut self, team: Option<TeamId>) -> Self {
        self.team = team;
        self
    }

    /// Mirrors every task into the selected team's issues.
    ///
    /// # Errors
    ///
    /// Returns a [`super::MirrorError`] when no team is available or a
    /// pre-batch read fails. Per-task failures are reported in the
    /// returned [`SyncReport`].
    pub async fn run(&self) -> MirrorResult<SyncReport> {
        info!("starting task → issue sync");
        let team = select_team(self.tracker.as_ref(), self.team.as_ref()).await?;
        let states = self.tracker.list_workflow_states(team.id()).await?;
        info!(count = states.len(), "loaded workflow states");
        let tasks = self.store.list_tasks().await?;
        info!(count = tasks.len(), "loaded tasks");
        let issues = self
            .tracker
            .list_issues(&IssueScope::Team(team.id().clone()))
            .await?;
        let mut index = LinkIndex::build(issues);

        let direction = TaskToIssue::new(
            Arc::clone(&self.store),
            Arc::clone(&self.tracker),
            team,
            states,
        );
        Ok(Reconciler::new(direction)
            .reconcile(&tasks, &mut index)
            .await)
    }
}
