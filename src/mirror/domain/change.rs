//! Change Detector: decides whether a linked target is stale.
//!
//! Each detector compares the target as stored with the fields the source
//! wants it to carry, after mapping through [`super::mapping`]. The first
//! mismatch is enough; callers re-send the whole desired field set.

use super::mapping::{
    desired_rank, pull_request_status, rank_to_priority, resolve_state_or_backlog,
    state_name_to_status, status_to_state_name,
};
use super::{
    DueDate, IssueRecord, PriorityRank, PullRequestRecord, TaskPriority, TaskRecord, TaskStatus,
    WorkflowState,
};

/// Fields a task wants its linked issue to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredIssueFields {
    state_name: &'static str,
    priority: Option<PriorityRank>,
    due_date: Option<DueDate>,
}

impl DesiredIssueFields {
    /// Maps a task into the tracker vocabulary.
    #[must_use]
    pub fn from_task(task: &TaskRecord) -> Self {
        Self {
            state_name: status_to_state_name(task.status()),
            priority: desired_rank(task.priority()),
            due_date: task.due_date(),
        }
    }

    /// Returns the workflow state name.
    #[must_use]
    pub const fn state_name(&self) -> &'static str {
        self.state_name
    }

    /// Returns the priority rank; absent when the task never had one.
    #[must_use]
    pub const fn priority(&self) -> Option<PriorityRank> {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    /// Returns the state this task's issue should sit in within `catalogue`.
    ///
    /// Falls back to the first backlog-category state when no state matches
    /// the desired name.
    #[must_use]
    pub fn target_state<'a>(&self, catalogue: &'a [WorkflowState]) -> Option<&'a WorkflowState> {
        resolve_state_or_backlog(catalogue, self.state_name)
    }

    /// Returns `true` when `issue` differs in state, priority, or due date.
    ///
    /// The state compares against [`Self::target_state`]; when nothing in
    /// `catalogue` resolves, the state cannot be written and never counts.
    #[must_use]
    pub fn is_stale(&self, issue: &IssueRecord, catalogue: &[WorkflowState]) -> bool {
        let state_differs = self.target_state(catalogue).is_some_and(|target| {
            issue.state().map(WorkflowState::id) != Some(target.id())
        });
        state_differs || issue.priority() != self.priority || issue.due_date() != self.due_date
    }
}

/// Fields an issue wants its linked task to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesiredTaskFields {
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<DueDate>,
}

impl DesiredTaskFields {
    /// Maps an issue into the task store vocabulary.
    #[must_use]
    pub fn from_issue(issue: &IssueRecord) -> Self {
        Self {
            status: issue_status(issue),
            priority: rank_to_priority(issue.priority()),
            due_date: issue.due_date(),
        }
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the named priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    /// Returns `true` when `task` differs in status, priority, or due date.
    ///
    /// A task without a priority compares as `Medium`.
    #[must_use]
    pub fn is_stale(&self, task: &TaskRecord) -> bool {
        task.status() != self.status
            || task.priority().unwrap_or(TaskPriority::Medium) != self.priority
            || task.due_date() != self.due_date
    }
}

/// Fields a pull request wants its linked task to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredReviewFields {
    status: TaskStatus,
    url: String,
}

impl DesiredReviewFields {
    /// Maps a pull request's lifecycle onto task fields.
    #[must_use]
    pub fn from_pull_request(pull_request: &PullRequestRecord) -> Self {
        Self {
            status: pull_request_status(pull_request),
            url: pull_request.url().to_owned(),
        }
    }

    /// Returns the review/done status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the pull request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` when `task` differs in status or URL.
    #[must_use]
    pub fn is_stale(&self, task: &TaskRecord) -> bool {
        task.status() != self.status || task.pull_request_url() != Some(self.url.as_str())
    }
}

/// Maps an issue's workflow state name onto a task status.
#[must_use]
pub fn issue_status(issue: &IssueRecord) -> TaskStatus {
    state_name_to_status(issue.state().map(WorkflowState::name))
}
