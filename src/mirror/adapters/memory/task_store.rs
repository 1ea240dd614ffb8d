//! In-memory task store.

use super::{poisoned, rejected};
use crate::mirror::{
    domain::{TaskDraft, TaskId, TaskPatch, TaskRecord},
    ports::{RemoteError, RemoteResult, TaskStore},
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const SERVICE: &str = "task store";

/// Thread-safe in-memory task store.
///
/// Clones share state, so a test can hand one clone to a service and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<TaskStoreState>>,
    faults: Arc<Faults>,
}

#[derive(Debug, Default)]
struct TaskStoreState {
    tasks: Vec<TaskRecord>,
    create_calls: u32,
    update_calls: u32,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    rejected_titles: HashSet<String>,
    rejected_updates: HashSet<TaskId>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
        Self {
            state: Arc::new(RwLock::new(TaskStoreState {
                tasks: tasks.into_iter().collect(),
                ..TaskStoreState::default()
            })),
            faults: Arc::default(),
        }
    }

    /// Makes creates of tasks with this title fail.
    #[must_use]
    pub fn rejecting_creates_titled(mut self, title: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.faults)
            .rejected_titles
            .insert(title.into());
        self
    }

    /// Makes updates of this task fail.
    #[must_use]
    pub fn rejecting_updates_for(mut self, id: TaskId) -> Self {
        Arc::make_mut(&mut self.faults).rejected_updates.insert(id);
        self
    }

    /// Returns a copy of every stored task.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the state lock is poisoned.
    pub fn snapshot(&self) -> RemoteResult<Vec<TaskRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.clone())
    }

    /// Returns how many create calls were made, successful or not.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the state lock is poisoned.
    pub fn create_calls(&self) -> RemoteResult<u32> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.create_calls)
    }

    /// Returns how many update calls were made, successful or not.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the state lock is poisoned.
    pub fn update_calls(&self) -> RemoteResult<u32> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.update_calls)
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self) -> RemoteResult<Vec<TaskRecord>> {
        self.snapshot()
    }

    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<TaskRecord> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.create_calls = state.create_calls.saturating_add(1);
        if self.faults.rejected_titles.contains(&draft.title) {
            return Err(rejected(SERVICE, format!("create rejected: {}", draft.title)));
        }
        let id = TaskId::new(Uuid::new_v4().to_string())
            .map_err(|err| RemoteError::decode(SERVICE, err.to_string()))?;
        let record = draft.clone().into_record(id);
        state.tasks.push(record.clone());
        Ok(record)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> RemoteResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.update_calls = state.update_calls.saturating_add(1);
        if self.faults.rejected_updates.contains(id) {
            return Err(rejected(SERVICE, format!("update rejected: {id}")));
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        task.apply(patch);
        Ok(())
    }
}
