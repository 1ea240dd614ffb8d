//! Issue tracker → task store mirroring.

use super::{MirrorDirection, MirrorResult, Reconciler};
use crate::mirror::{
    domain::{
        DesiredTaskFields, IssueLink, IssueRecord, LinkIndex, SyncReport, TaskDraft, TaskPatch,
        TaskRecord,
    },
    ports::{IssueScope, IssueTracker, RemoteResult, TaskStore},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Mirrors issues into tasks.
pub struct IssueToTask<S> {
    store: Arc<S>,
}

impl<S: TaskStore> IssueToTask<S> {
    /// Creates the direction writing into `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn link_of(issue: &IssueRecord) -> IssueLink {
    IssueLink::new(issue.key().clone(), issue.url().map(str::to_owned))
}

/// Renders task details: the issue description followed by a link line.
fn details_of(issue: &IssueRecord) -> Option<String> {
    let link_line = issue.url().map(|url| format!("[Linear Issue: {url}]"));
    match (issue.description(), link_line) {
        (Some(description), Some(line)) => Some(format!("{description}\n\n{line}")),
        (Some(description), None) => Some(description.to_owned()),
        (None, line) => line,
    }
}

#[async_trait]
impl<S: TaskStore> MirrorDirection for IssueToTask<S> {
    type Source = IssueRecord;
    type Target = TaskRecord;

    fn record_label(&self, source: &IssueRecord) -> String {
        source.key().to_string()
    }

    fn title<'a>(&self, source: &'a IssueRecord) -> &'a str {
        source.title()
    }

    fn needs_update(&self, target: &TaskRecord, source: &IssueRecord) -> bool {
        DesiredTaskFields::from_issue(source).is_stale(target)
    }

    async fn create(&self, source: &IssueRecord) -> RemoteResult<TaskRecord> {
        let desired = DesiredTaskFields::from_issue(source);
        let mut draft = TaskDraft::new(source.title());
        draft.status = desired.status();
        draft.priority = Some(desired.priority());
        draft.due_date = desired.due_date();
        draft.details = details_of(source);
        draft.issue_link = Some(link_of(source));
        self.store.create_task(&draft).await
    }

    async fn update(&self, target: &TaskRecord, source: &IssueRecord) -> RemoteResult<()> {
        let desired = DesiredTaskFields::from_issue(source);
        let patch = TaskPatch {
            status: Some(desired.status()),
            priority: Some(desired.priority()),
            due_date: Some(desired.due_date()),
            details: details_of(source),
            ..TaskPatch::default()
        };
        self.store.update_task(target.id(), &patch).await
    }
}

/// Runs the issue tracker → task store operation.
pub struct IssueToTaskSync<S, T> {
    store: Arc<S>,
    tracker: Arc<T>,
}

impl<S, T> IssueToTaskSync<S, T>
where
    S: TaskStore,
    T: IssueTracker,
{
    /// Creates the operation.
    #[must_use]
    pub const fn new(store: Arc<S>, tracker: Arc<T>) -> Self {
        Self { store, tracker }
    }

    /// Mirrors every visible issue into the task store.
    ///
    /// # Errors
    ///
    /// Returns a [`super::MirrorError`] when a pre-batch read fails.
    /// Per-issue failures are reported in the returned [`SyncReport`].
    pub async fn run(&self) -> MirrorResult<SyncReport> {
        info!("starting issue → task sync");
        let issues = self.tracker.list_issues(&IssueScope::All).await?;
        info!(count = issues.len(), "loaded issues");
        let tasks = self.store.list_tasks().await?;
        info!(count = tasks.len(), "loaded tasks");
        let mut index = LinkIndex::build(tasks);

        let direction = IssueToTask::new(Arc::clone(&self.store));
        Ok(Reconciler::new(direction)
            .reconcile(&issues, &mut index)
            .await)
    }
}
