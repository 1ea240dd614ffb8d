//! Task Record types owned by the task store (System A).

use super::{DueDate, IssueKey, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow status in the task store vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is awaiting review.
    InReview,
    /// Work is finished.
    Done,
    /// Work was abandoned.
    Canceled,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
        Self::Canceled,
    ];

    /// Returns the label stored in the task store's status select.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::Done => "Done",
            Self::Canceled => "Canceled",
        }
    }

    /// Parses a status label case-insensitively.
    ///
    /// Returns `None` for labels outside the vocabulary; callers decide the
    /// fallback.
    #[must_use]
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "to do" | "todo" => Some(Self::Todo),
            "in progress" => Some(Self::InProgress),
            "in review" => Some(Self::InReview),
            "done" => Some(Self::Done),
            "canceled" | "cancelled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Returns `true` for statuses that end a task's lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Task priority in the task store vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Needs attention immediately.
    Urgent,
    /// Important.
    High,
    /// Default importance.
    Medium,
    /// Can wait.
    Low,
}

impl TaskPriority {
    /// Every priority, most urgent first.
    pub const ALL: [Self; 4] = [Self::Urgent, Self::High, Self::Medium, Self::Low];

    /// Returns the label stored in the task store's priority select.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parses a priority label case-insensitively.
    #[must_use]
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cross-reference written onto a task, naming its counterpart issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLink {
    key: IssueKey,
    url: Option<String>,
}

impl IssueLink {
    /// Creates a link to the given issue.
    #[must_use]
    pub const fn new(key: IssueKey, url: Option<String>) -> Self {
        Self { key, url }
    }

    /// Returns the linked issue key.
    #[must_use]
    pub const fn key(&self) -> &IssueKey {
        &self.key
    }

    /// Renders the link text stored in the task's cross-reference field.
    #[must_use]
    pub fn to_text(&self) -> String {
        match &self.url {
            Some(url) => format!("{} - {url}", self.key),
            None => self.key.to_string(),
        }
    }
}

/// Snapshot of a task as read from the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    id: TaskId,
    title: String,
    status: TaskStatus,
    priority: Option<TaskPriority>,
    due_date: Option<DueDate>,
    details: Option<String>,
    issue_key: Option<IssueKey>,
    pull_request_url: Option<String>,
    assignees: Vec<String>,
}

impl TaskRecord {
    /// Creates a task snapshot with the given title in `Todo` status.
    ///
    /// The title is trimmed but not validated: the task store can hold
    /// untitled records, and the reconciler decides what to do with them.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into().trim().to_owned(),
            status: TaskStatus::Todo,
            priority: None,
            due_date: None,
            details: None,
            issue_key: None,
            pull_request_url: None,
            assignees: Vec::new(),
        }
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the free-text details, dropping blank values.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = non_blank(details.into());
        self
    }

    /// Sets the embedded issue cross-reference.
    #[must_use]
    pub fn with_issue_key(mut self, key: IssueKey) -> Self {
        self.issue_key = Some(key);
        self
    }

    /// Sets the embedded pull request URL, dropping blank values.
    #[must_use]
    pub fn with_pull_request_url(mut self, url: impl Into<String>) -> Self {
        self.pull_request_url = non_blank(url.into());
        self
    }

    /// Sets the assignee display names.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.assignees = assignees
            .into_iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the (possibly empty) title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority, if one was ever set.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    /// Returns the free-text details.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the embedded issue cross-reference.
    #[must_use]
    pub const fn issue_key(&self) -> Option<&IssueKey> {
        self.issue_key.as_ref()
    }

    /// Returns the embedded pull request URL.
    #[must_use]
    pub fn pull_request_url(&self) -> Option<&str> {
        self.pull_request_url.as_deref()
    }

    /// Returns the assignee display names.
    #[must_use]
    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    /// Returns `true` when nobody is assigned and the task is still open.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.assignees.is_empty() && !self.status.is_terminal()
    }

    /// Applies a patch as the task store would.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(details) = &patch.details {
            self.details = non_blank(details.clone());
        }
        if let Some(link) = &patch.issue_link {
            self.issue_key = Some(link.key().clone());
        }
        if let Some(url) = &patch.pull_request_url {
            self.pull_request_url = non_blank(url.clone());
        }
        if let Some(assignee) = &patch.assignee {
            self.assignees = vec![assignee.clone()];
        }
    }
}

/// Field set for creating a task in the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: Option<TaskPriority>,
    /// Free-text details.
    pub details: Option<String>,
    /// Due date.
    pub due_date: Option<DueDate>,
    /// Cross-reference to the counterpart issue.
    pub issue_link: Option<IssueLink>,
    /// Pull request the task mirrors.
    pub pull_request_url: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with the given title in `Todo` status.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: TaskStatus::Todo,
            priority: None,
            details: None,
            due_date: None,
            issue_link: None,
            pull_request_url: None,
        }
    }

    /// Materializes the draft as a record, as the task store would.
    #[must_use]
    pub fn into_record(self, id: TaskId) -> TaskRecord {
        let mut record = TaskRecord::new(id, self.title).with_status(self.status);
        record.priority = self.priority;
        record.due_date = self.due_date;
        record.details = self.details.and_then(non_blank);
        record.issue_key = self.issue_link.map(|link| link.key);
        record.pull_request_url = self.pull_request_url.and_then(non_blank);
        record
    }
}

/// Partial update for a task; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<DueDate>>,
    /// New free-text details.
    pub details: Option<String>,
    /// New cross-reference to the counterpart issue.
    pub issue_link: Option<IssueLink>,
    /// New pull request URL.
    pub pull_request_url: Option<String>,
    /// Sole assignee display name.
    pub assignee: Option<String>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the cross-reference.
    #[must_use]
    pub fn with_issue_link(mut self, link: IssueLink) -> Self {
        self.issue_link = Some(link);
        self
    }

    /// Sets the pull request URL.
    #[must_use]
    pub fn with_pull_request_url(mut self, url: impl Into<String>) -> Self {
        self.pull_request_url = Some(url.into());
        self
    }

    /// Sets the sole assignee.
    #[must_use]
    pub fn with_assignee(mut self, name: impl Into<String>) -> Self {
        self.assignee = Some(name.into());
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
