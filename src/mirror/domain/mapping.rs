//! Vocabulary translation between the task store and the issue tracker.
//!
//! Status and priority vocabularies never share a representation: every
//! comparison across the two systems goes through these functions. All of
//! them are total. Unknown input falls back rather than failing:
//!
//! - unknown status → `Todo` / `backlog` (the most backlog-like value);
//! - absent numeric priority → `Medium` on the named side;
//! - unknown named priority → `Medium`.
//!
//! The priority mapping is deliberately lossy in one direction: a task that
//! never had a priority stays absent on the numeric side, but an issue with
//! no priority maps to `Medium`, which then maps to rank `3`.

use super::{
    PriorityRank, PullRequestRecord, PullRequestState, StateCategory, TaskPriority, TaskStatus,
    WorkflowState,
};

/// Maps a task status to the tracker's workflow state name.
#[must_use]
pub const fn status_to_state_name(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "backlog",
        TaskStatus::InProgress => "in progress",
        TaskStatus::InReview => "in review",
        TaskStatus::Done => "done",
        TaskStatus::Canceled => "canceled",
    }
}

/// Maps a tracker workflow state name to a task status, ignoring case.
///
/// Absent or unrecognized names map to [`TaskStatus::Todo`].
#[must_use]
pub fn state_name_to_status(name: Option<&str>) -> TaskStatus {
    let normalized = name.map(|value| value.trim().to_ascii_lowercase());
    match normalized.as_deref() {
        Some("in progress") => TaskStatus::InProgress,
        Some("in review") => TaskStatus::InReview,
        Some("done") => TaskStatus::Done,
        Some("canceled") => TaskStatus::Canceled,
        _ => TaskStatus::Todo,
    }
}

/// Parses a task store status label, defaulting unknown labels to `Todo`.
#[must_use]
pub fn parse_status_label(label: Option<&str>) -> TaskStatus {
    label
        .and_then(TaskStatus::from_label)
        .unwrap_or(TaskStatus::Todo)
}

/// Parses a task store priority label.
///
/// Absent labels stay absent; unknown labels become `Medium`.
#[must_use]
pub fn parse_priority_label(label: Option<&str>) -> Option<TaskPriority> {
    label.map(|value| TaskPriority::from_label(value).unwrap_or(TaskPriority::Medium))
}

/// Maps a named priority to its numeric rank.
#[must_use]
pub const fn priority_to_rank(priority: TaskPriority) -> PriorityRank {
    match priority {
        TaskPriority::Urgent => PriorityRank::URGENT,
        TaskPriority::High => PriorityRank::HIGH,
        TaskPriority::Medium => PriorityRank::MEDIUM,
        TaskPriority::Low => PriorityRank::LOW,
    }
}

/// Maps a numeric rank (possibly absent) to a named priority.
#[must_use]
pub const fn rank_to_priority(rank: Option<PriorityRank>) -> TaskPriority {
    match rank {
        Some(PriorityRank::URGENT) => TaskPriority::Urgent,
        Some(PriorityRank::HIGH) => TaskPriority::High,
        Some(PriorityRank::LOW) => TaskPriority::Low,
        Some(_) | None => TaskPriority::Medium,
    }
}

/// Maps a task's priority to the rank an issue should carry.
///
/// A task that never had a priority yields no rank.
#[must_use]
pub fn desired_rank(priority: Option<TaskPriority>) -> Option<PriorityRank> {
    priority.map(priority_to_rank)
}

/// Finds the workflow state whose name or category matches `target`.
#[must_use]
pub fn resolve_state<'a>(catalogue: &'a [WorkflowState], target: &str) -> Option<&'a WorkflowState> {
    catalogue.iter().find(|state| state.matches(target))
}

/// Resolves `target`, falling back to the first backlog-category state.
#[must_use]
pub fn resolve_state_or_backlog<'a>(
    catalogue: &'a [WorkflowState],
    target: &str,
) -> Option<&'a WorkflowState> {
    resolve_state(catalogue, target).or_else(|| {
        catalogue
            .iter()
            .find(|state| state.category() == StateCategory::Backlog)
    })
}

/// Finds the state a finished issue should move to.
#[must_use]
pub fn completed_state(catalogue: &[WorkflowState]) -> Option<&WorkflowState> {
    catalogue
        .iter()
        .find(|state| state.category() == StateCategory::Completed)
        .or_else(|| resolve_state(catalogue, status_to_state_name(TaskStatus::Done)))
}

/// Finds the state an issue under review should sit in: a state named for
/// review, else the first started-category state.
#[must_use]
pub fn review_state(catalogue: &[WorkflowState]) -> Option<&WorkflowState> {
    catalogue
        .iter()
        .find(|state| state.name().to_ascii_lowercase().contains("review"))
        .or_else(|| {
            catalogue
                .iter()
                .find(|state| state.category() == StateCategory::Started)
        })
}

/// Maps a pull request's lifecycle onto the task status it implies.
///
/// Open pull requests are in review; merged or otherwise closed ones are
/// done.
#[must_use]
pub const fn pull_request_status(pull_request: &PullRequestRecord) -> TaskStatus {
    match pull_request.state() {
        PullRequestState::Open if !pull_request.is_merged() => TaskStatus::InReview,
        PullRequestState::Open | PullRequestState::Closed => TaskStatus::Done,
    }
}

