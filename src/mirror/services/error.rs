//! Fatal errors that abort a mirror operation before any batch work.

use crate::mirror::{domain::TeamId, ports::RemoteError};
use thiserror::Error;

/// Errors that stop a whole mirror operation.
///
/// Per-record failures never surface here; they are collected in the
/// operation's [`crate::mirror::domain::SyncReport`].
#[derive(Debug, Clone, Error)]
pub enum MirrorError {
    /// The tracker lists no teams to mirror into.
    #[error("no issue tracker teams found")]
    NoTeams,

    /// The configured team is not among the listed teams.
    #[error("issue tracker team not found: {0}")]
    UnknownTeam(TeamId),

    /// A pre-batch read failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;
