//! Domain model for cross-system task mirroring.
//!
//! Records from the task store, the issue tracker, and the pull request
//! source are read-only snapshots here. The mirror owns no durable state;
//! it only decides which point-in-time create and update calls to make.

pub mod change;
mod due_date;
mod error;
mod ids;
mod issue;
pub mod link;
pub mod mapping;
mod pull_request;
mod report;
mod task;

pub use change::{DesiredIssueFields, DesiredReviewFields, DesiredTaskFields, issue_status};
pub use due_date::DueDate;
pub use error::MirrorDomainError;
pub use ids::{IssueId, IssueKey, RepositoryFullName, TaskId, TeamId, WorkflowStateId};
pub use issue::{
    IssueDraft, IssuePatch, IssueRecord, PriorityRank, StateCategory, Team, WorkflowState,
};
pub use link::{
    LinkIndex, LinkKey, Linkable, TASK_BACK_REFERENCE_PREFIX, back_reference_line,
    extract_issue_key, extract_pull_request_number, extract_task_back_reference,
};
pub use pull_request::{PullRequestNumber, PullRequestRecord, PullRequestState};
pub use report::{ItemFailure, RecordOutcome, RecordState, SyncReport};
pub use task::{IssueLink, TaskDraft, TaskPatch, TaskPriority, TaskRecord, TaskStatus};
