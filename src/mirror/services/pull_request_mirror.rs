//! Pull request → task mirroring, with the merged-means-done cascade.

use super::{MirrorResult, select_team};
use crate::mirror::{
    domain::{
        DesiredReviewFields, IssueDraft, IssueKey, IssueLink, IssuePatch, ItemFailure, LinkIndex,
        PullRequestRecord, RecordState, SyncReport, TaskDraft, TaskPatch,
        TaskPriority, TaskRecord, Team, TeamId, WorkflowState, back_reference_line,
        mapping::{completed_state, review_state},
    },
    ports::{IssueTracker, PullRequestQuery, PullRequestSource, RemoteResult, TaskStore},
};
use chrono::Duration;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Default look-back window for closed pull requests.
pub const DEFAULT_RECENT_DAYS: i64 = 7;

/// Runs the pull request → task operation.
pub struct PullRequestMirror<S, T, P, C> {
    store: Arc<S>,
    tracker: Arc<T>,
    pulls: Arc<P>,
    clock: Arc<C>,
    recent_window: Duration,
    team: Option<TeamId>,
}

/// Issue-tracker lookups cached for one run.
#[derive(Default)]
struct RunCache {
    states: HashMap<TeamId, Vec<WorkflowState>>,
    companion_team: Option<Option<Team>>,
}

impl<S, T, P, C> PullRequestMirror<S, T, P, C>
where
    S: TaskStore,
    T: IssueTracker,
    P: PullRequestSource,
    C: Clock + Send + Sync,
{
    /// Creates the operation with the default recent window.
    #[must_use]
    pub fn new(store: Arc<S>, tracker: Arc<T>, pulls: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            tracker,
            pulls,
            clock,
            recent_window: Duration::days(DEFAULT_RECENT_DAYS),
            team: None,
        }
    }

    /// Sets how far back closed pull requests are considered.
    #[must_use]
    pub const fn with_recent_window(mut self, window: Duration) -> Self {
        self.recent_window = window;
        self
    }

    /// Sets the team companion issues are created in.
    #[must_use]
    pub fn with_team(mut self, team: Option<TeamId>) -> Self {
        self.team = team;
        self
    }

    /// Mirrors open and recently closed pull requests into tasks.
    ///
    /// # Errors
    ///
    /// Returns a [`super::MirrorError`] when a pre-batch read fails.
    /// Per-pull-request failures are reported in the returned
    /// [`SyncReport`].
    pub async fn run(&self) -> MirrorResult<SyncReport> {
        info!("starting pull request sync");
        let open = self.pulls.list_pull_requests(PullRequestQuery::Open).await?;
        let cutoff = self.clock.utc() - self.recent_window;
        let recent_closed = self
            .pulls
            .list_pull_requests(PullRequestQuery::ClosedSince(cutoff))
            .await?;
        info!(
            open = open.len(),
            recently_closed = recent_closed.len(),
            "loaded pull requests"
        );
        let tasks = self.store.list_tasks().await?;
        let mut index = LinkIndex::build(tasks);

        let mut report = SyncReport::new();
        let mut cache = RunCache::default();
        for pull in open.iter().chain(recent_closed.iter()) {
            let label = format!("PR #{}", pull.number());
            let state = match index.link(pull).cloned() {
                Some(task) => self.refresh(&label, &task, pull, &mut cache, &mut report).await,
                None => match self.create(&label, pull, &mut cache).await {
                    Ok(task) => {
                        report.record_created();
                        index.insert(task);
                        RecordState::Pending.synced()
                    }
                    Err(err) => {
                        warn!(record = %label, error = %err, "task create failed");
                        report.record_error(ItemFailure::new(&label, err.to_string()));
                        RecordState::Pending.failed()
                    }
                },
            };
            report.settle(label, state);
        }
        info!(%report, "pull request sync finished");
        Ok(report)
    }

    async fn refresh(
        &self,
        label: &str,
        task: &TaskRecord,
        pull: &PullRequestRecord,
        cache: &mut RunCache,
        report: &mut SyncReport,
    ) -> RecordState {
        let desired = DesiredReviewFields::from_pull_request(pull);
        let state = if desired.is_stale(task) {
            let patch = TaskPatch::new()
                .with_status(desired.status())
                .with_pull_request_url(desired.url());
            match self.store.update_task(task.id(), &patch).await {
                Ok(()) => {
                    report.record_updated();
                    if pull.is_merged() {
                        report.record_completed();
                        info!(
                            record = label,
                            task_id = %task.id(),
                            "marked task done for merged pull request"
                        );
                    }
                    RecordState::Pending.synced()
                }
                Err(err) => {
                    warn!(record = label, error = %err, "task update failed");
                    report.record_error(ItemFailure::new(label, err.to_string()));
                    return RecordState::Pending.failed();
                }
            }
        } else {
            report.record_skipped();
            RecordState::Pending.skipped()
        };
        if pull.is_merged()
            && let Some(key) = task.issue_key()
        {
            self.complete_issue(label, key, cache).await;
        }
        state
    }

    /// Moves the linked issue to its team's completed state.
    ///
    /// Every failure here is logged and swallowed.
    async fn complete_issue(&self, label: &str, key: &IssueKey, cache: &mut RunCache) {
        if let Err(err) = self.try_complete_issue(label, key, cache).await {
            warn!(
                record = label,
                issue_key = %key,
                error = %err,
                "could not complete linked issue"
            );
        }
    }

    async fn try_complete_issue(
        &self,
        label: &str,
        key: &IssueKey,
        cache: &mut RunCache,
    ) -> RemoteResult<()> {
        let Some(issue) = self.tracker.find_issue(key).await? else {
            info!(record = label, issue_key = %key, "linked issue not found; skipping cascade");
            return Ok(());
        };
        if issue.state().is_some_and(|state| state.category().is_terminal()) {
            return Ok(());
        }
        let Some(team_id) = issue.team_id() else {
            info!(record = label, issue_key = %key, "linked issue has no team; skipping cascade");
            return Ok(());
        };
        let states = self.states_for(team_id, cache).await?;
        let Some(done) = completed_state(states) else {
            info!(
                record = label,
                issue_key = %key,
                "team has no completed state; skipping cascade"
            );
            return Ok(());
        };
        let patch = IssuePatch::new().with_state(done.id().clone());
        self.tracker.update_issue(issue.id(), &patch).await?;
        info!(record = label, issue_key = %key, "marked linked issue done");
        Ok(())
    }

    async fn states_for<'c>(
        &self,
        team_id: &TeamId,
        cache: &'c mut RunCache,
    ) -> RemoteResult<&'c [WorkflowState]> {
        if !cache.states.contains_key(team_id) {
            let states = self.tracker.list_workflow_states(team_id).await?;
            cache.states.insert(team_id.clone(), states);
        }
        Ok(cache
            .states
            .get(team_id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    async fn create(
        &self,
        label: &str,
        pull: &PullRequestRecord,
        cache: &mut RunCache,
    ) -> RemoteResult<TaskRecord> {
        let desired = DesiredReviewFields::from_pull_request(pull);
        let title = format!("PR #{}: {}", pull.number(), pull.title());
        let details = match pull.body() {
            Some(body) => format!("GitHub PR: {}\n\n{body}", pull.url()),
            None => format!("GitHub PR: {}", pull.url()),
        };
        let mut draft = TaskDraft::new(title);
        draft.status = desired.status();
        draft.priority = Some(TaskPriority::Medium);
        draft.details = Some(details);
        draft.pull_request_url = Some(desired.url().to_owned());
        let task = self.store.create_task(&draft).await?;
        info!(record = label, task_id = %task.id(), "created task for pull request");

        if pull.is_merged() {
            return Ok(task);
        }
        match self.create_companion_issue(&task, cache).await {
            Ok(Some(link)) => {
                let key = link.key().clone();
                let patch = TaskPatch::new().with_issue_link(link);
                match self.store.update_task(task.id(), &patch).await {
                    Ok(()) => {
                        info!(record = label, issue_key = %key, "linked task to companion issue");
                        let mut linked = task;
                        linked.apply(&patch);
                        return Ok(linked);
                    }
                    Err(err) => {
                        warn!(
                            record = label,
                            issue_key = %key,
                            error = %err,
                            "could not link companion issue"
                        );
                    }
                }
            }
            Ok(None) => {}
            Err(err) => warn!(record = label, error = %err, "could not create companion issue"),
        }
        Ok(task)
    }

    async fn create_companion_issue(
        &self,
        task: &TaskRecord,
        cache: &mut RunCache,
    ) -> RemoteResult<Option<IssueLink>> {
        let Some(team) = self.companion_team(cache).await else {
            return Ok(None);
        };
        let states = self.states_for(team.id(), cache).await?;
        let mut draft = IssueDraft::new(team.id().clone(), task.title());
        let back_reference = back_reference_line(task.id());
        draft.description = Some(match task.details() {
            Some(details) => format!("{details}\n\n{back_reference}"),
            None => back_reference,
        });
        draft.state_id = review_state(states).map(|state| state.id().clone());
        let issue = self.tracker.create_issue(&draft).await?;
        Ok(Some(IssueLink::new(
            issue.key().clone(),
            issue.url().map(str::to_owned),
        )))
    }

    async fn companion_team(&self, cache: &mut RunCache) -> Option<Team> {
        if cache.companion_team.is_none() {
            let selected = match select_team(self.tracker.as_ref(), self.team.as_ref()).await {
                Ok(team) => Some(team),
                Err(err) => {
                    warn!(error = %err, "no team for companion issues");
                    None
                }
            };
            cache.companion_team = Some(selected);
        }
        cache.companion_team.clone().flatten()
    }
}
