//! In-memory pull request source.

use crate::mirror::{
    domain::PullRequestRecord,
    ports::{PullRequestQuery, PullRequestSource, RemoteResult},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Fixed, read-only set of pull requests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPullRequests {
    records: Arc<Vec<PullRequestRecord>>,
}

impl InMemoryPullRequests {
    /// Creates a source serving `records`.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = PullRequestRecord>) -> Self {
        Self {
            records: Arc::new(records.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PullRequestSource for InMemoryPullRequests {
    async fn list_pull_requests(
        &self,
        query: PullRequestQuery,
    ) -> RemoteResult<Vec<PullRequestRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| query.admits(record))
            .cloned()
            .collect())
    }
}
