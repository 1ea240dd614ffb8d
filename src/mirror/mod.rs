//! Cross-system mirroring between the task store, the issue tracker, and
//! the pull request source.
//!
//! Each operation reads snapshots from the remote systems, links records
//! by canonical keys, and issues the create and update calls needed to
//! bring the target side in line. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
