//! Shared fixtures for in-memory integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use tasksync::mirror::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskStore},
    domain::{TaskId, TaskRecord, Team, TeamId},
};

/// Returns a task id shaped like the task store's UUIDs.
pub fn task_id(n: u32) -> TaskId {
    TaskId::new(format!("{n:08x}-1111-4000-8000-000000000000")).expect("valid task id")
}

/// Returns a `Todo` task with the given title.
pub fn task(n: u32, title: &str) -> TaskRecord {
    TaskRecord::new(task_id(n), title)
}

/// Returns the team every tracker fixture owns.
pub fn engineering() -> Team {
    Team::new(
        TeamId::new("team-eng").expect("valid team id"),
        "Engineering",
        "ENG",
    )
}

/// Provides a tracker with one team and the default workflow.
#[fixture]
pub fn tracker() -> InMemoryIssueTracker {
    InMemoryIssueTracker::new().with_team(engineering())
}

/// Provides an empty task store.
#[fixture]
pub fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Provides a clock pinned to a fixed instant.
#[fixture]
pub fn clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2026, 10, 17, 6, 0, 0)
            .single()
            .expect("valid instant"),
    )
}
