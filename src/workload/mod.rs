//! Workload-balanced assignment of unassigned tasks to a fixed roster of
//! agents.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]
//!
//! The service reuses the mirror ports to read tasks and issues and to
//! write assignees.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
