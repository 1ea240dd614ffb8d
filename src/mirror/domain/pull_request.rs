//! Pull Request Record types read from the source-hosting service.

use super::MirrorDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive pull request number.
///
/// # Examples
///
///     use tasksync::mirror::domain::PullRequestNumber;
///
///     let pr_num = PullRequestNumber::new(42).expect("valid");
///     assert_eq!(pr_num.value(), 42);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Creates a validated pull request number.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::InvalidPullRequestNumber`] when the value
    /// is zero.
    pub const fn new(value: u64) -> Result<Self, MirrorDomainError> {
        if value == 0 {
            return Err(MirrorDomainError::InvalidPullRequestNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open/closed state, used both on records and as a list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    /// Still open for review.
    Open,
    /// Closed, merged or not.
    Closed,
}

impl PullRequestState {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    number: PullRequestNumber,
    title: String,
    body: Option<String>,
    state: PullRequestState,
    merged_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    url: String,
}

impl PullRequestRecord {
    /// Creates an open pull request snapshot.
    #[must_use]
    pub fn new(number: PullRequestNumber, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            body: None,
            state: PullRequestState::Open,
            merged_at: None,
            closed_at: None,
            url: url.into(),
        }
    }

    /// Sets the body text, dropping blank values.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let value = body.into();
        self.body = (!value.trim().is_empty()).then_some(value);
        self
    }

    /// Marks the pull request closed at the given instant without merging.
    #[must_use]
    pub const fn closed_at(mut self, at: DateTime<Utc>) -> Self {
        self.state = PullRequestState::Closed;
        self.closed_at = Some(at);
        self
    }

    /// Marks the pull request merged (and therefore closed) at the given
    /// instant.
    #[must_use]
    pub const fn merged_at(mut self, at: DateTime<Utc>) -> Self {
        self.state = PullRequestState::Closed;
        self.merged_at = Some(at);
        self.closed_at = Some(at);
        self
    }

    /// Returns the number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the open/closed state.
    #[must_use]
    pub const fn state(&self) -> PullRequestState {
        self.state
    }

    /// Returns the merge timestamp.
    #[must_use]
    pub const fn merged_timestamp(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Returns the closing timestamp.
    #[must_use]
    pub const fn closed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the web URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` when the pull request was merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Returns `true` when the pull request closed strictly after `cutoff`.
    #[must_use]
    pub fn closed_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.closed_at.is_some_and(|closed_at| closed_at > cutoff)
    }
}
