//! Issue Record types owned by the issue tracker (System B).

use super::{DueDate, IssueId, IssueKey, MirrorDomainError, TeamId, WorkflowStateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable classification underlying a team-configurable workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateCategory {
    /// Not yet triaged into the active workflow.
    Backlog,
    /// Planned but not started.
    Unstarted,
    /// Work underway (including review).
    Started,
    /// Finished.
    Completed,
    /// Abandoned.
    Canceled,
}

impl StateCategory {
    /// Returns the tracker's category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Unstarted => "unstarted",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Parses the tracker's category name.
    ///
    /// The tracker's `triage` category is treated as backlog; anything else
    /// unknown yields `None`.
    #[must_use]
    pub fn from_type(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" | "triage" => Some(Self::Backlog),
            "unstarted" => Some(Self::Unstarted),
            "started" => Some(Self::Started),
            "completed" => Some(Self::Completed),
            "canceled" | "cancelled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Returns `true` for categories that end an issue's lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team's workflow state: configurable name over a stable category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    id: WorkflowStateId,
    name: String,
    category: StateCategory,
}

impl WorkflowState {
    /// Creates a workflow state.
    #[must_use]
    pub fn new(id: WorkflowStateId, name: impl Into<String>, category: StateCategory) -> Self {
        Self {
            id,
            name: name.into().trim().to_owned(),
            category,
        }
    }

    /// Returns the state identifier.
    #[must_use]
    pub const fn id(&self) -> &WorkflowStateId {
        &self.id
    }

    /// Returns the team-configured name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stable category.
    #[must_use]
    pub const fn category(&self) -> StateCategory {
        self.category
    }

    /// Returns `true` when `target` names this state or its category,
    /// ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, target: &str) -> bool {
        let wanted = target.trim();
        self.name.eq_ignore_ascii_case(wanted) || self.category.as_str().eq_ignore_ascii_case(wanted)
    }
}

/// Integer priority rank: `1` is most urgent, `4` least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityRank(u8);

impl PriorityRank {
    /// Rank `1`.
    pub const URGENT: Self = Self(1);
    /// Rank `2`.
    pub const HIGH: Self = Self(2);
    /// Rank `3`.
    pub const MEDIUM: Self = Self(3);
    /// Rank `4`.
    pub const LOW: Self = Self(4);

    /// Creates a validated rank.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::InvalidPriorityRank`] outside `1..=4`.
    pub fn new(value: i64) -> Result<Self, MirrorDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|rank| (1..=4).contains(rank))
            .map(Self)
            .ok_or(MirrorDomainError::InvalidPriorityRank(value))
    }

    /// Interprets a tracker wire value, where `0` (and anything out of
    /// range) means "no priority".
    #[must_use]
    pub fn from_wire(value: i64) -> Option<Self> {
        Self::new(value).ok()
    }

    /// Returns the numeric rank.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PriorityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issue-tracker team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    name: String,
    key: String,
}

impl Team {
    /// Creates a team.
    #[must_use]
    pub fn new(id: TeamId, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            key: key.into(),
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> &TeamId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the short-code prefix used for the team's issue keys.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Snapshot of an issue as read from the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    id: IssueId,
    key: IssueKey,
    title: String,
    description: Option<String>,
    state: Option<WorkflowState>,
    priority: Option<PriorityRank>,
    assignee: Option<String>,
    due_date: Option<DueDate>,
    url: Option<String>,
    team_id: Option<TeamId>,
}

impl IssueRecord {
    /// Creates an issue snapshot with the required identity fields.
    #[must_use]
    pub fn new(id: IssueId, key: IssueKey, title: impl Into<String>) -> Self {
        Self {
            id,
            key,
            title: title.into().trim().to_owned(),
            description: None,
            state: None,
            priority: None,
            assignee: None,
            due_date: None,
            url: None,
            team_id: None,
        }
    }

    /// Sets the description, dropping blank values.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        self.description = (!value.trim().is_empty()).then_some(value);
        self
    }

    /// Sets the workflow state.
    #[must_use]
    pub fn with_state(mut self, state: WorkflowState) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the priority rank.
    #[must_use]
    pub const fn with_priority(mut self, priority: PriorityRank) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the assignee display name.
    #[must_use]
    pub fn with_assignee(mut self, name: impl Into<String>) -> Self {
        let value = name.into();
        self.assignee = (!value.trim().is_empty()).then(|| value.trim().to_owned());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the web URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the owning team.
    #[must_use]
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> &IssueId {
        &self.id
    }

    /// Returns the short code.
    #[must_use]
    pub const fn key(&self) -> &IssueKey {
        &self.key
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow state.
    #[must_use]
    pub const fn state(&self) -> Option<&WorkflowState> {
        self.state.as_ref()
    }

    /// Returns the priority rank.
    #[must_use]
    pub const fn priority(&self) -> Option<PriorityRank> {
        self.priority
    }

    /// Returns the assignee display name.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    /// Returns the web URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    /// Returns `true` unless the issue sits in a completed or canceled state.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self
            .state
            .as_ref()
            .is_some_and(|state| state.category().is_terminal())
    }

    /// Applies a patch as the tracker would, resolving the state id against
    /// the team's workflow catalogue.
    pub fn apply(&mut self, patch: &IssuePatch, catalogue: &[WorkflowState]) {
        if let Some(state_id) = &patch.state_id
            && let Some(state) = catalogue.iter().find(|state| state.id() == state_id)
        {
            self.state = Some(state.clone());
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}

/// Field set for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    /// Owning team.
    pub team_id: TeamId,
    /// Issue title.
    pub title: String,
    /// Description, including any back-reference line.
    pub description: Option<String>,
    /// Initial workflow state.
    pub state_id: Option<WorkflowStateId>,
    /// Initial priority rank.
    pub priority: Option<PriorityRank>,
    /// Due date.
    pub due_date: Option<DueDate>,
}

impl IssueDraft {
    /// Creates a draft for the given team and title.
    #[must_use]
    pub fn new(team_id: TeamId, title: impl Into<String>) -> Self {
        Self {
            team_id,
            title: title.into(),
            description: None,
            state_id: None,
            priority: None,
            due_date: None,
        }
    }

    /// Materializes the draft as a record, as the tracker would.
    #[must_use]
    pub fn into_record(
        self,
        id: IssueId,
        key: IssueKey,
        catalogue: &[WorkflowState],
    ) -> IssueRecord {
        let mut record = IssueRecord::new(id, key, self.title).with_team(self.team_id);
        if let Some(description) = self.description {
            record = record.with_description(description);
        }
        record.state = self
            .state_id
            .and_then(|state_id| catalogue.iter().find(|state| *state.id() == state_id))
            .cloned();
        record.priority = self.priority;
        record.due_date = self.due_date;
        record
    }
}

/// Partial update for an issue.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    /// New workflow state.
    pub state_id: Option<WorkflowStateId>,
    /// New priority rank.
    pub priority: Option<Option<PriorityRank>>,
    /// New due date.
    pub due_date: Option<Option<DueDate>>,
}

impl IssuePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the workflow state.
    #[must_use]
    pub fn with_state(mut self, state_id: WorkflowStateId) -> Self {
        self.state_id = Some(state_id);
        self
    }

    /// Sets (or clears) the priority rank.
    #[must_use]
    pub const fn with_priority(mut self, priority: Option<PriorityRank>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets (or clears) the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DueDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
