//! Shared world state for reconciliation BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use tasksync::mirror::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskStore},
    domain::{SyncReport, TaskRecord},
    services::{MirrorResult, TaskToIssueSync},
};

/// Scenario world for reconciliation behaviour tests.
pub struct ReconcileWorld {
    pub store: InMemoryTaskStore,
    pub tracker: InMemoryIssueTracker,
    pub results: Vec<MirrorResult<SyncReport>>,
}

impl ReconcileWorld {
    /// Creates a world with an empty store and a tracker without teams.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: InMemoryTaskStore::new(),
            tracker: InMemoryIssueTracker::new(),
            results: Vec::new(),
        }
    }

    /// Runs one task → issue sync against the world's adapters.
    pub fn run_sync(&mut self) {
        let sync = TaskToIssueSync::new(
            Arc::new(self.store.clone()),
            Arc::new(self.tracker.clone()),
        );
        let result = run_async(sync.run());
        self.results.push(result);
    }

    /// Returns the report of the most recent run.
    pub fn last_report(&self) -> Result<&SyncReport, eyre::Report> {
        match self.results.last() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre::eyre!("sync failed: {err}")),
            None => Err(eyre::eyre!("no sync has run in this scenario")),
        }
    }

    /// Finds a stored task by title.
    pub fn task_titled(&self, title: &str) -> Result<TaskRecord, eyre::Report> {
        self.store
            .snapshot()
            .map_err(|err| eyre::eyre!("task snapshot failed: {err}"))?
            .into_iter()
            .find(|task| task.title() == title)
            .ok_or_else(|| eyre::eyre!("no task titled {title}"))
    }
}

impl Default for ReconcileWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReconcileWorld {
    ReconcileWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
