//! Error types for mirror domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing mirror domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MirrorDomainError {
    /// An opaque identifier was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// The issue short code does not follow `TEAM-123` format.
    #[error("invalid issue key '{0}', expected TEAM-123")]
    InvalidIssueKey(String),

    /// The pull request number is invalid.
    #[error("invalid pull request number {0}, expected a positive integer")]
    InvalidPullRequestNumber(u64),

    /// The repository name does not follow `owner/repo` format.
    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// The priority rank lies outside `1..=4`.
    #[error("invalid priority rank {0}, expected 1 to 4")]
    InvalidPriorityRank(i64),

    /// The due date is not a calendar date.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),
}
