//! Pull request source port (read-only).

use super::RemoteResult;
use crate::mirror::domain::{PullRequestRecord, PullRequestState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Which pull requests a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestQuery {
    /// Every open pull request.
    Open,
    /// Closed pull requests whose closing time is after the cutoff.
    ClosedSince(DateTime<Utc>),
}

impl PullRequestQuery {
    /// Returns the state this query lists.
    #[must_use]
    pub const fn state(self) -> PullRequestState {
        match self {
            Self::Open => PullRequestState::Open,
            Self::ClosedSince(_) => PullRequestState::Closed,
        }
    }

    /// Returns `true` when `record` belongs in this query's result.
    #[must_use]
    pub fn admits(self, record: &PullRequestRecord) -> bool {
        match self {
            Self::Open => record.state() == PullRequestState::Open,
            Self::ClosedSince(cutoff) => {
                record.state() == PullRequestState::Closed && record.closed_after(cutoff)
            }
        }
    }
}

/// Read contract for the source-hosting service's pull requests.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Lists the pull requests `query` admits, following pagination.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when any page cannot be fetched or
    /// decoded.
    async fn list_pull_requests(
        &self,
        query: PullRequestQuery,
    ) -> RemoteResult<Vec<PullRequestRecord>>;
}
