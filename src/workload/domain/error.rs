//! Error types for workload domain validation.

use thiserror::Error;

/// Errors returned while constructing workload domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkloadDomainError {
    /// The agent name was empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name exceeds the maximum length.
    #[error("agent name exceeds 100 characters: '{0}'")]
    AgentNameTooLong(String),

    /// The roster names no agents.
    #[error("agent roster must not be empty")]
    EmptyRoster,

    /// The roster names an agent twice.
    #[error("agent '{0}' appears more than once in the roster")]
    DuplicateAgent(String),
}
