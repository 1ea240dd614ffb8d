//! Shared builders for mirror tests.

use crate::mirror::{
    adapters::memory::default_workflow,
    domain::{IssueId, IssueKey, IssueRecord, Team, TeamId, TaskId, TaskRecord, WorkflowState},
};
use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Task ids shaped like the task store's UUIDs, so back-references parse.
pub(super) fn task_id(n: u32) -> TaskId {
    TaskId::new(format!("{n:08x}-0000-4000-8000-000000000000")).expect("valid task id")
}

pub(super) fn task(n: u32, title: &str) -> TaskRecord {
    TaskRecord::new(task_id(n), title)
}

pub(super) fn engineering() -> Team {
    Team::new(
        TeamId::new("team-eng").expect("valid team id"),
        "Engineering",
        "ENG",
    )
}

pub(super) fn workflow_state(name: &str) -> WorkflowState {
    default_workflow("ENG")
        .into_iter()
        .find(|state| state.name() == name)
        .expect("state in default workflow")
}

pub(super) fn issue(key: &str, title: &str) -> IssueRecord {
    IssueRecord::new(
        IssueId::new(format!("id-{key}")).expect("valid issue id"),
        IssueKey::new(key).expect("valid issue key"),
        title,
    )
    .with_team(engineering().id().clone())
    .with_url(format!("https://tracker.invalid/issue/{key}"))
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
