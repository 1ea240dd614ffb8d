//! Application services for the mirror operations.

mod error;
mod issue_to_task;
mod pull_request_mirror;
mod reconciler;
mod task_to_issue;
mod team;

pub use error::{MirrorError, MirrorResult};
pub use issue_to_task::{IssueToTask, IssueToTaskSync};
pub use pull_request_mirror::{DEFAULT_RECENT_DAYS, PullRequestMirror};
pub use reconciler::{MirrorDirection, Reconciler};
pub use task_to_issue::{TaskToIssue, TaskToIssueSync};
pub use team::select_team;
