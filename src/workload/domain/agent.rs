//! Agent identities, the fixed roster, and the per-agent capacity.

use super::WorkloadDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 100;

/// Names the agents work is assigned to by default.
pub const DEFAULT_AGENTS: [&str; 4] = ["Composer", "Codex", "Claude", "Gemini"];

/// Default number of open items an agent may hold.
pub const DEFAULT_CAPACITY: u32 = 3;

/// Display name of a work-assignment target.
///
/// Names are trimmed but keep their case, since assignee matching is
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadDomainError::EmptyAgentName`] when the value is
    /// empty after trimming, or [`WorkloadDomainError::AgentNameTooLong`]
    /// when it exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkloadDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(WorkloadDomainError::EmptyAgentName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(WorkloadDomainError::AgentNameTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty set of agents. Order breaks workload ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Vec<AgentName>);

impl Roster {
    /// Creates a roster in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadDomainError::EmptyRoster`] for an empty list or
    /// [`WorkloadDomainError::DuplicateAgent`] when a name repeats.
    pub fn new(agents: impl IntoIterator<Item = AgentName>) -> Result<Self, WorkloadDomainError> {
        let mut ordered: Vec<AgentName> = Vec::new();
        for agent in agents {
            if ordered.contains(&agent) {
                return Err(WorkloadDomainError::DuplicateAgent(agent.0));
            }
            ordered.push(agent);
        }
        if ordered.is_empty() {
            return Err(WorkloadDomainError::EmptyRoster);
        }
        Ok(Self(ordered))
    }

    /// Parses a comma-separated list of names.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkloadDomainError`] when any name is invalid or the
    /// resulting roster is empty or repeats a name.
    pub fn parse(list: &str) -> Result<Self, WorkloadDomainError> {
        let agents = list
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(AgentName::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(agents)
    }

    /// Returns the agents in roster order.
    #[must_use]
    pub fn agents(&self) -> &[AgentName] {
        &self.0
    }

    /// Returns the first agent whose name occurs in `assignee`.
    ///
    /// This is a substring match, so `Codex` also claims `CodexBot`.
    #[must_use]
    pub fn match_assignee(&self, assignee: &str) -> Option<&AgentName> {
        self.0.iter().find(|agent| assignee.contains(agent.as_str()))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self(
            DEFAULT_AGENTS
                .iter()
                .map(|name| AgentName((*name).to_owned()))
                .collect(),
        )
    }
}

/// Maximum open items per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(u32);

impl Capacity {
    /// Wraps a per-agent cap.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the cap.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` while `load` leaves room for another item.
    #[must_use]
    pub const fn admits(self, load: u32) -> bool {
        load < self.0
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(DEFAULT_CAPACITY)
    }
}
