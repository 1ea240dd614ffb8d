//! Domain model for workload-balanced task assignment.
//!
//! Workload is measured fresh on every run from the open items each agent
//! holds; nothing about past assignments is stored.

mod agent;
mod balance;
mod error;

pub use agent::{AgentName, Capacity, DEFAULT_AGENTS, DEFAULT_CAPACITY, Roster};
pub use balance::{AgentLoad, Assignment, Workload, WorkloadBalancer};
pub use error::WorkloadDomainError;
