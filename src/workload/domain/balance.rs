//! Workload measurement and least-loaded selection.

use super::{AgentName, Capacity, Roster};
use crate::mirror::domain::{IssueKey, IssueRecord, TaskId, TaskRecord};
use serde::Serialize;

/// Open-item count of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentLoad {
    /// The agent.
    pub agent: AgentName,
    /// Open items currently held.
    pub load: u32,
}

/// Per-agent open-item counts, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Workload(Vec<AgentLoad>);

impl Workload {
    /// Creates a zero workload for every agent in the roster.
    #[must_use]
    pub fn empty(roster: &Roster) -> Self {
        Self(
            roster
                .agents()
                .iter()
                .map(|agent| AgentLoad {
                    agent: agent.clone(),
                    load: 0,
                })
                .collect(),
        )
    }

    /// Counts open tasks and open issues per agent.
    ///
    /// A task counts for each of its assignees; an issue counts for its
    /// single assignee. Each name is credited to the first roster agent
    /// whose name it contains.
    #[must_use]
    pub fn measure(roster: &Roster, tasks: &[TaskRecord], issues: &[IssueRecord]) -> Self {
        let mut workload = Self::empty(roster);
        let task_assignees = tasks
            .iter()
            .filter(|task| !task.status().is_terminal())
            .flat_map(|task| task.assignees().iter().map(String::as_str));
        let issue_assignees = issues
            .iter()
            .filter(|issue| issue.is_open())
            .filter_map(IssueRecord::assignee);
        for name in task_assignees.chain(issue_assignees) {
            if let Some(agent) = roster.match_assignee(name) {
                workload.record(agent);
            }
        }
        workload
    }

    /// Adds one item to `agent`'s count; unknown agents are ignored.
    pub fn record(&mut self, agent: &AgentName) {
        if let Some(entry) = self.0.iter_mut().find(|entry| entry.agent == *agent) {
            entry.load = entry.load.saturating_add(1);
        }
    }

    /// Returns the count for `agent`.
    #[must_use]
    pub fn load_of(&self, agent: &AgentName) -> Option<u32> {
        self.0
            .iter()
            .find(|entry| entry.agent == *agent)
            .map(|entry| entry.load)
    }

    /// Returns every agent's count in roster order.
    #[must_use]
    pub fn entries(&self) -> &[AgentLoad] {
        &self.0
    }
}

/// A task handed to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    task_id: TaskId,
    agent: AgentName,
    issue_key: Option<IssueKey>,
}

impl Assignment {
    /// Creates an assignment of `task` to `agent`.
    #[must_use]
    pub fn new(task: &TaskRecord, agent: AgentName) -> Self {
        Self {
            task_id: task.id().clone(),
            agent,
            issue_key: task.issue_key().cloned(),
        }
    }

    /// Returns the assigned task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the chosen agent.
    #[must_use]
    pub const fn agent(&self) -> &AgentName {
        &self.agent
    }

    /// Returns the task's linked issue, if any.
    #[must_use]
    pub const fn issue_key(&self) -> Option<&IssueKey> {
        self.issue_key.as_ref()
    }
}

/// Picks the least-loaded agent under capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadBalancer {
    workload: Workload,
    capacity: Capacity,
}

impl WorkloadBalancer {
    /// Creates a balancer over a measured workload.
    #[must_use]
    pub const fn new(workload: Workload, capacity: Capacity) -> Self {
        Self { workload, capacity }
    }

    /// Returns the agent with the smallest load strictly under capacity.
    ///
    /// Ties go to the agent listed first in the roster. `None` means every
    /// agent is full.
    #[must_use]
    pub fn select(&self) -> Option<&AgentName> {
        self.workload
            .entries()
            .iter()
            .filter(|entry| self.capacity.admits(entry.load))
            .min_by_key(|entry| entry.load)
            .map(|entry| &entry.agent)
    }

    /// Proposes an agent for `task` without counting it yet.
    ///
    /// `None` means every agent is full and the run should stop.
    #[must_use]
    pub fn propose(&self, task: &TaskRecord) -> Option<Assignment> {
        self.select().map(|agent| Assignment::new(task, agent.clone()))
    }

    /// Counts an applied assignment against its agent.
    pub fn commit(&mut self, assignment: &Assignment) {
        self.workload.record(assignment.agent());
    }

    /// Returns the current workload.
    #[must_use]
    pub const fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Returns the per-agent cap.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }
}
