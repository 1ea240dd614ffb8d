//! In-memory issue tracker.

use super::{poisoned, rejected};
use crate::mirror::{
    domain::{
        IssueDraft, IssueId, IssueKey, IssuePatch, IssueRecord, StateCategory, Team, TeamId,
        WorkflowState, WorkflowStateId,
    },
    ports::{IssueScope, IssueTracker, RemoteError, RemoteResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const SERVICE: &str = "issue tracker";

/// Builds the workflow catalogue most teams start with.
///
/// State ids are derived from the team key so catalogues of different
/// teams never collide.
#[must_use]
pub fn default_workflow(team_key: &str) -> Vec<WorkflowState> {
    [
        ("backlog", "Backlog", StateCategory::Backlog),
        ("todo", "Todo", StateCategory::Unstarted),
        ("in-progress", "In Progress", StateCategory::Started),
        ("in-review", "In Review", StateCategory::Started),
        ("done", "Done", StateCategory::Completed),
        ("canceled", "Canceled", StateCategory::Canceled),
    ]
    .into_iter()
    .filter_map(|(slug, name, category)| {
        WorkflowStateId::new(format!("{}-{slug}", team_key.to_ascii_lowercase()))
            .ok()
            .map(|id| WorkflowState::new(id, name, category))
    })
    .collect()
}

/// Thread-safe in-memory issue tracker.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<TrackerState>>,
    faults: Arc<Faults>,
}

#[derive(Debug, Default)]
struct TrackerState {
    teams: Vec<TeamEntry>,
    issues: Vec<IssueRecord>,
    create_calls: u32,
    update_calls: u32,
}

#[derive(Debug)]
struct TeamEntry {
    team: Team,
    states: Vec<WorkflowState>,
    next_number: u32,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    rejected_titles: HashSet<String>,
    rejected_updates: HashSet<IssueId>,
}

impl InMemoryIssueTracker {
    /// Creates a tracker with no teams.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a team with the [`default_workflow`] catalogue.
    #[must_use]
    pub fn with_team(self, team: Team) -> Self {
        let states = default_workflow(team.key());
        self.with_team_states(team, states)
    }

    /// Adds a team with a custom workflow catalogue.
    #[must_use]
    pub fn with_team_states(self, team: Team, states: Vec<WorkflowState>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.teams.push(TeamEntry {
                team,
                states,
                next_number: 1,
            });
        }
        self
    }

    /// Seeds existing issues.
    #[must_use]
    pub fn with_issues(self, issues: impl IntoIterator<Item = IssueRecord>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.issues.extend(issues);
        }
        self
    }

    /// Makes creates of issues with this title fail.
    #[must_use]
    pub fn rejecting_creates_titled(mut self, title: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.faults)
            .rejected_titles
            .insert(title.into());
        self
    }

    /// Makes updates of this issue fail.
    #[must_use]
    pub fn rejecting_updates_for(mut self, id: IssueId) -> Self {
        Arc::make_mut(&mut self.faults).rejected_updates.insert(id);
        self
    }

    /// Returns a copy of every stored issue.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the state lock is poisoned.
    pub fn snapshot(&self) -> RemoteResult<Vec<IssueRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.issues.clone())
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

fn catalogue_of<'a>(teams: &'a [TeamEntry], team_id: Option<&TeamId>) -> &'a [WorkflowState] {
    team_id
        .and_then(|id| teams.iter().find(|entry| entry.team.id() == id))
        .map(|entry| entry.states.as_slice())
        .unwrap_or_default()
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn list_teams(&self) -> RemoteResult<Vec<Team>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.teams.iter().map(|entry| entry.team.clone()).collect())
    }

    async fn list_workflow_states(&self, team: &TeamId) -> RemoteResult<Vec<WorkflowState>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(catalogue_of(&state.teams, Some(team)).to_vec())
    }

    async fn list_issues(&self, scope: &IssueScope) -> RemoteResult<Vec<IssueRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .issues
            .iter()
            .filter(|issue| match scope {
                IssueScope::All => true,
                IssueScope::Team(team) => issue.team_id() == Some(team),
            })
            .cloned()
            .collect())
    }

    async fn find_issue(&self, key: &IssueKey) -> RemoteResult<Option<IssueRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.issues.iter().find(|issue| issue.key() == key).cloned())
    }

    async fn create_issue(&self, draft: &IssueDraft) -> RemoteResult<IssueRecord> {
        let mut guard = self.state.write().map_err(poisoned)?;
        let state = &mut *guard;
        state.create_calls = state.create_calls.saturating_add(1);
        if self.faults.rejected_titles.contains(&draft.title) {
            return Err(rejected(SERVICE, format!("create rejected: {}", draft.title)));
        }
        let entry = state
            .teams
            .iter_mut()
            .find(|entry| *entry.team.id() == draft.team_id)
            .ok_or_else(|| RemoteError::NotFound(draft.team_id.to_string()))?;
        let key = IssueKey::new(format!("{}-{}", entry.team.key(), entry.next_number))
            .map_err(|err| RemoteError::decode(SERVICE, err.to_string()))?;
        entry.next_number = entry.next_number.saturating_add(1);
        let id = IssueId::new(Uuid::new_v4().to_string())
            .map_err(|err| RemoteError::decode(SERVICE, err.to_string()))?;
        let url = format!("https://tracker.invalid/issue/{key}");
        let record = draft
            .clone()
            .into_record(id, key, &entry.states)
            .with_url(url);
        state.issues.push(record.clone());
        Ok(record)
    }

    async fn update_issue(&self, id: &IssueId, patch: &IssuePatch) -> RemoteResult<()> {
        let mut guard = self.state.write().map_err(poisoned)?;
        let state = &mut *guard;
        state.update_calls = state.update_calls.saturating_add(1);
        if self.faults.rejected_updates.contains(id) {
            return Err(rejected(SERVICE, format!("update rejected: {id}")));
        }
        let catalogues: HashMap<&TeamId, &[WorkflowState]> = state
            .teams
            .iter()
            .map(|entry| (entry.team.id(), entry.states.as_slice()))
            .collect();
        let issue = state
            .issues
            .iter_mut()
            .find(|issue| issue.id() == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        let catalogue = issue
            .team_id()
            .and_then(|team| catalogues.get(team).copied())
            .unwrap_or_default();
        issue.apply(patch, catalogue);
        Ok(())
    }
}
