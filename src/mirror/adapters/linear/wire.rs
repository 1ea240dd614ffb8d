//! Wire format of the GraphQL issue tracker.

use crate::mirror::domain::{
    DueDate, IssueDraft, IssueId, IssueKey, IssuePatch, IssueRecord, PriorityRank, StateCategory,
    Team, TeamId, WorkflowState, WorkflowStateId,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Selection set requested for every issue.
macro_rules! issue_fields {
    () => {
        "id identifier title description priority dueDate url \
         assignee { name } team { id } state { id name type }"
    };
}

pub(super) const TEAMS_QUERY: &str = "query { teams { nodes { id name key } } }";

pub(super) const STATES_QUERY: &str = "query($teamId: ID!) { \
     workflowStates(filter: { team: { id: { eq: $teamId } } }) { nodes { id name type } } }";

pub(super) const ISSUES_QUERY: &str = concat!(
    "query($first: Int!, $after: String, $filter: IssueFilter) { ",
    "issues(first: $first, after: $after, filter: $filter) { nodes { ",
    issue_fields!(),
    " } pageInfo { hasNextPage endCursor } } }"
);

pub(super) const CREATE_MUTATION: &str = concat!(
    "mutation($input: IssueCreateInput!) { issueCreate(input: $input) { success issue { ",
    issue_fields!(),
    " } } }"
);

pub(super) const UPDATE_MUTATION: &str = "mutation($id: String!, $input: IssueUpdateInput!) { \
     issueUpdate(id: $id, input: $input) { success } }";

#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(super) struct TeamsData {
    pub teams: Nodes<TeamNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatesData {
    pub workflow_states: Nodes<StateNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct IssuesData {
    pub issues: Connection<IssueNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateData {
    pub issue_create: MutationPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateData {
    pub issue_update: MutationPayload,
}

#[derive(Debug, Deserialize)]
pub(super) struct MutationPayload {
    pub success: bool,
    pub issue: Option<IssueNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TeamNode {
    pub id: String,
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct StateNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct NameNode {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct IdNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IssueNode {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    pub due_date: Option<String>,
    pub url: Option<String>,
    pub assignee: Option<NameNode>,
    pub team: Option<IdNode>,
    pub state: Option<StateNode>,
}

impl TeamNode {
    pub fn into_team(self) -> Result<Team, String> {
        let id = TeamId::new(self.id).map_err(|err| err.to_string())?;
        Ok(Team::new(id, self.name, self.key))
    }
}

impl StateNode {
    /// Converts the node, reading unknown categories as `started`.
    pub fn into_state(self) -> Result<WorkflowState, String> {
        let id = WorkflowStateId::new(self.id).map_err(|err| err.to_string())?;
        let category = StateCategory::from_type(&self.category).unwrap_or(StateCategory::Started);
        Ok(WorkflowState::new(id, self.name, category))
    }
}

impl IssueNode {
    pub fn into_record(self) -> Result<IssueRecord, String> {
        let id = IssueId::new(self.id).map_err(|err| err.to_string())?;
        let key = IssueKey::new(self.identifier).map_err(|err| err.to_string())?;
        let mut record = IssueRecord::new(id, key, self.title);
        if let Some(description) = self.description {
            record = record.with_description(description);
        }
        if let Some(rank) = self.priority.and_then(PriorityRank::from_wire) {
            record = record.with_priority(rank);
        }
        if let Some(due) = self.due_date.as_deref().and_then(|value| DueDate::parse(value).ok()) {
            record = record.with_due_date(due);
        }
        if let Some(url) = self.url {
            record = record.with_url(url);
        }
        if let Some(name) = self.assignee.and_then(|assignee| assignee.name) {
            record = record.with_assignee(name);
        }
        if let Some(team) = self.team {
            record = record.with_team(TeamId::new(team.id).map_err(|err| err.to_string())?);
        }
        if let Some(state) = self.state {
            record = record.with_state(state.into_state()?);
        }
        Ok(record)
    }
}

/// Builds the `IssueCreateInput` object; absent fields are omitted.
pub(super) fn create_input(draft: &IssueDraft) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("teamId".to_owned(), Value::from(draft.team_id.as_str()));
    input.insert("title".to_owned(), Value::from(draft.title.as_str()));
    if let Some(description) = &draft.description {
        input.insert("description".to_owned(), Value::from(description.as_str()));
    }
    if let Some(state_id) = &draft.state_id {
        input.insert("stateId".to_owned(), Value::from(state_id.as_str()));
    }
    if let Some(rank) = draft.priority {
        input.insert("priority".to_owned(), Value::from(rank.value()));
    }
    if let Some(due) = draft.due_date {
        input.insert("dueDate".to_owned(), Value::from(due.to_string()));
    }
    input
}

/// Builds the `IssueUpdateInput` object.
///
/// A cleared priority is sent as `0` and a cleared due date as `null`.
pub(super) fn update_input(patch: &IssuePatch) -> Map<String, Value> {
    let mut input = Map::new();
    if let Some(state_id) = &patch.state_id {
        input.insert("stateId".to_owned(), Value::from(state_id.as_str()));
    }
    if let Some(priority) = patch.priority {
        let wire = priority.map_or(0, PriorityRank::value);
        input.insert("priority".to_owned(), Value::from(wire));
    }
    if let Some(due) = patch.due_date {
        let wire = due.map_or(Value::Null, |value| Value::from(value.to_string()));
        input.insert("dueDate".to_owned(), wire);
    }
    input
}
