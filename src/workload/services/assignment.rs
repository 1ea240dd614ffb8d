//! Applies the balancer's choices to the task store.

use crate::mirror::{
    domain::{IssueKey, ItemFailure, TaskPatch, TaskRecord},
    ports::{IssueScope, IssueTracker, RemoteError, TaskStore},
};
use crate::workload::domain::{
    AgentName, Assignment, Capacity, Roster, Workload, WorkloadBalancer,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop the assignment run before any task is touched.
#[derive(Debug, Clone, Error)]
pub enum AssignmentError {
    /// A pre-batch read failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result type for assignment runs.
pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// Outcome of one assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    assignments: Vec<Assignment>,
    errors: Vec<ItemFailure>,
    left_unassigned: u32,
    workload: Workload,
}

impl AssignmentReport {
    /// Returns the assignments made.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns how many tasks were assigned.
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.assignments.len()
    }

    /// Returns the per-task failures.
    #[must_use]
    pub fn errors(&self) -> &[ItemFailure] {
        &self.errors
    }

    /// Returns how many unassigned tasks were left because every agent
    /// was full.
    #[must_use]
    pub const fn left_unassigned(&self) -> u32 {
        self.left_unassigned
    }

    /// Returns the workload after this run's assignments.
    #[must_use]
    pub const fn workload(&self) -> &Workload {
        &self.workload
    }
}

impl fmt::Display for AssignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assigned={} left_unassigned={} errors={}",
            self.assignments.len(),
            self.left_unassigned,
            self.errors.len()
        )
    }
}

/// Assigns unassigned open tasks to the least-loaded agents.
pub struct AssignmentService<S, T> {
    store: Arc<S>,
    tracker: Arc<T>,
    roster: Roster,
    capacity: Capacity,
}

impl<S, T> AssignmentService<S, T>
where
    S: TaskStore,
    T: IssueTracker,
{
    /// Creates the service with the default roster and capacity.
    #[must_use]
    pub fn new(store: Arc<S>, tracker: Arc<T>) -> Self {
        Self {
            store,
            tracker,
            roster: Roster::default(),
            capacity: Capacity::default(),
        }
    }

    /// Replaces the roster.
    #[must_use]
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Replaces the per-agent capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Measures workload and assigns unassigned tasks until every agent is
    /// full.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Remote`] when the task or issue listing
    /// fails. Failed task updates are reported, not returned.
    pub async fn run(&self) -> AssignmentResult<AssignmentReport> {
        info!("starting task assignment");
        let tasks = self.store.list_tasks().await?;
        let issues = self.tracker.list_issues(&IssueScope::All).await?;
        let workload = Workload::measure(&self.roster, &tasks, &issues);
        for entry in workload.entries() {
            info!(agent = %entry.agent, load = entry.load, "current workload");
        }
        let unassigned: Vec<&TaskRecord> =
            tasks.iter().filter(|task| task.is_unassigned()).collect();
        info!(count = unassigned.len(), "found unassigned tasks");

        let mut balancer = WorkloadBalancer::new(workload, self.capacity);
        let mut assignments = Vec::new();
        let mut errors = Vec::new();
        let mut left_unassigned = 0_u32;
        for (position, task) in unassigned.iter().enumerate() {
            let Some(assignment) = balancer.propose(task) else {
                left_unassigned = u32::try_from(unassigned.len().saturating_sub(position))
                    .unwrap_or(u32::MAX);
                warn!(remaining = left_unassigned, "all agents at capacity; stopping");
                break;
            };
            let agent = assignment.agent();
            let patch = TaskPatch::new().with_assignee(agent.as_str());
            match self.store.update_task(task.id(), &patch).await {
                Ok(()) => {
                    balancer.commit(&assignment);
                    info!(
                        task_id = %task.id(),
                        %agent,
                        load = balancer.workload().load_of(agent).unwrap_or_default(),
                        "assigned task"
                    );
                    if let Some(key) = assignment.issue_key() {
                        self.note_manual_step(key, agent).await;
                    }
                    assignments.push(assignment);
                }
                Err(err) => {
                    warn!(task_id = %task.id(), error = %err, "assignment failed");
                    errors.push(ItemFailure::new(task.id().as_str(), err.to_string()));
                }
            }
        }

        let report = AssignmentReport {
            assignments,
            errors,
            left_unassigned,
            workload: balancer.workload().clone(),
        };
        info!(%report, "task assignment finished");
        Ok(report)
    }

    /// Logs that the linked issue needs assigning by hand; the tracker
    /// assigns by user id, not display name.
    async fn note_manual_step(&self, key: &IssueKey, agent: &AgentName) {
        match self.tracker.find_issue(key).await {
            Ok(Some(issue)) => info!(
                issue_key = %issue.key(),
                %agent,
                "manual assignment required for linked issue"
            ),
            Ok(None) => info!(issue_key = %key, "linked issue not found"),
            Err(err) => warn!(issue_key = %key, error = %err, "could not look up linked issue"),
        }
    }
}
