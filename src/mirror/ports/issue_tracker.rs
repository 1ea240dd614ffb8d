//! Issue tracker port (System B).

use super::RemoteResult;
use crate::mirror::domain::{
    IssueDraft, IssueId, IssueKey, IssuePatch, IssueRecord, Team, TeamId, WorkflowState,
};
use async_trait::async_trait;

/// Which issues a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueScope {
    /// Every issue visible to the credential.
    All,
    /// Issues owned by one team.
    Team(TeamId),
}

/// Read/write contract for the issue tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists the teams visible to the credential.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when the query fails.
    async fn list_teams(&self) -> RemoteResult<Vec<Team>>;

    /// Lists a team's workflow states.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when the query fails.
    async fn list_workflow_states(&self, team: &TeamId) -> RemoteResult<Vec<WorkflowState>>;

    /// Lists issues in scope, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when any page fails.
    async fn list_issues(&self, scope: &IssueScope) -> RemoteResult<Vec<IssueRecord>>;

    /// Looks an issue up by its short code.
    ///
    /// Returns `None` when no issue carries the key.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when the query fails.
    async fn find_issue(&self, key: &IssueKey) -> RemoteResult<Option<IssueRecord>>;

    /// Creates an issue and returns the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when the tracker rejects the create.
    async fn create_issue(&self, draft: &IssueDraft) -> RemoteResult<IssueRecord>;

    /// Applies a partial update to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when the tracker rejects the update.
    async fn update_issue(&self, id: &IssueId, patch: &IssuePatch) -> RemoteResult<()>;
}
