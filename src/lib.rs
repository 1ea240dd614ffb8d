//! Tasksync: keeps a task database, an issue tracker, and a repository's
//! pull requests in step, and spreads open work across a roster of agents.
//!
//! # Architecture
//!
//! Tasksync follows hexagonal architecture principles:
//!
//! - **Domain**: records, identifiers, field mapping, linking, and change
//!   detection with no infrastructure dependencies
//! - **Ports**: async traits for the task store, the issue tracker, and
//!   the pull request source
//! - **Adapters**: HTTP clients for each remote system plus in-memory
//!   doubles with failure injection
//!
//! # Modules
//!
//! - [`mirror`]: two-way task/issue reconciliation and pull request mirroring
//! - [`workload`]: capacity-bounded assignment of tasks to agents
//! - [`config`]: run configuration
//! - [`journal`]: run logging
//! - [`daily`]: the sequential daily driver
//! - [`cli`]: entry-point plumbing shared by the binaries

pub mod cli;
pub mod config;
pub mod daily;
pub mod journal;
pub mod mirror;
pub mod workload;
