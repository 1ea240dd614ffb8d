//! Identifier and validated scalar types for the mirror domain.

use super::MirrorDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalizes an opaque identifier, rejecting blank input.
fn opaque(value: impl Into<String>, kind: &'static str) -> Result<String, MirrorDomainError> {
    let raw = value.into();
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(MirrorDomainError::EmptyIdentifier(kind));
    }
    Ok(normalized.to_owned())
}

/// Opaque identifier of a Task Record in the task store (System A).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, MirrorDomainError> {
        opaque(value, "task id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of an Issue Record in the issue tracker (System B).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    /// Creates an issue identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, MirrorDomainError> {
        opaque(value, "issue id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of an issue-tracker team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    /// Creates a team identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, MirrorDomainError> {
        opaque(value, "team id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a team-configured workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowStateId(String);

impl WorkflowStateId {
    /// Creates a workflow state identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, MirrorDomainError> {
        opaque(value, "workflow state id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable issue short code such as `TEAM-123`.
///
/// The team prefix is one or more ASCII uppercase letters and the suffix is
/// a decimal sequence number.
///
/// # Examples
///
///     use tasksync::mirror::domain::IssueKey;
///
///     let key = IssueKey::new("FOS-42").expect("valid key");
///     assert_eq!(key.team_prefix(), "FOS");
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Creates a validated issue key.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::InvalidIssueKey`] when the value is not
    /// of the form `TEAM-123`.
    pub fn new(value: impl Into<String>) -> Result<Self, MirrorDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = normalized.split_once('-').is_some_and(|(prefix, number)| {
            !prefix.is_empty()
                && !number.is_empty()
                && prefix.chars().all(|c| c.is_ascii_uppercase())
                && number.chars().all(|c| c.is_ascii_digit())
        });
        if !is_valid {
            return Err(MirrorDomainError::InvalidIssueKey(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the team prefix (the part before the dash).
    #[must_use]
    pub fn team_prefix(&self) -> &str {
        self.0.split_once('-').map_or(self.0.as_str(), |(prefix, _)| prefix)
    }

    /// Returns the sequence number (the part after the dash).
    #[must_use]
    pub fn number(&self) -> u64 {
        self.0
            .split_once('-')
            .and_then(|(_, number)| number.parse().ok())
            .unwrap_or_default()
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized source-hosting repository identifier in `owner/repo` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryFullName(String);

impl RepositoryFullName {
    /// Creates a validated repository name.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::InvalidRepository`] if the value does not
    /// contain exactly one slash-delimited owner and repository segment.
    pub fn new(value: impl Into<String>) -> Result<Self, MirrorDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = normalized.split_once('/').is_some_and(|(owner, repo)| {
            !owner.is_empty() && !repo.is_empty() && !repo.contains('/')
        }) && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(MirrorDomainError::InvalidRepository(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Builds a repository name from separate owner and repository parts.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::InvalidRepository`] when either part is
    /// blank or malformed.
    pub fn from_parts(owner: &str, repo: &str) -> Result<Self, MirrorDomainError> {
        Self::new(format!("{}/{}", owner.trim(), repo.trim()))
    }

    /// Returns the repository name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryFullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
