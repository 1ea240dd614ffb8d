//! Issue tracker adapter for the GraphQL API.
//!
//! Every call is a `POST` of `{query, variables}` to one endpoint,
//! authenticated by the raw API key in the `Authorization` header.

mod wire;

use super::http::send_json;
use crate::mirror::{
    domain::{IssueDraft, IssueId, IssueKey, IssuePatch, IssueRecord, Team, TeamId, WorkflowState},
    ports::{IssueScope, IssueTracker, RemoteError, RemoteResult},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use wire::{CreateData, Envelope, IssueNode, IssuesData, StatesData, TeamsData, UpdateData};

const SERVICE: &str = "linear";

/// Default GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";

const PAGE_SIZE: u32 = 100;

/// Connection settings for the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSettings {
    /// GraphQL endpoint.
    pub api_url: String,
    /// API key sent verbatim in `Authorization`.
    pub token: String,
}

impl LinearSettings {
    /// Creates settings for `token` against the public endpoint.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: token.into(),
        }
    }

    /// Overrides the endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// HTTP-backed [`IssueTracker`].
#[derive(Debug, Clone)]
pub struct LinearIssueTracker {
    client: Client,
    settings: LinearSettings,
}

impl LinearIssueTracker {
    /// Creates a client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(settings: LinearSettings) -> RemoteResult<Self> {
        let client = Client::builder().build().map_err(RemoteError::transport)?;
        Ok(Self { client, settings })
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> RemoteResult<T> {
        let request = self
            .client
            .post(&self.settings.api_url)
            .header(reqwest::header::AUTHORIZATION, &self.settings.token)
            .json(&json!({ "query": query, "variables": variables }));
        let envelope: Envelope<T> = send_json(SERVICE, request).await?;
        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RemoteError::Query {
                service: SERVICE,
                message,
            });
        }
        envelope
            .data
            .ok_or_else(|| RemoteError::decode(SERVICE, "response carried no data"))
    }

    async fn issues_matching(&self, filter: Value) -> RemoteResult<Vec<IssueRecord>> {
        let mut issues = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let variables = json!({ "first": PAGE_SIZE, "after": after, "filter": filter });
            let data: IssuesData = self.execute(wire::ISSUES_QUERY, variables).await?;
            debug!(count = data.issues.nodes.len(), "fetched issue page");
            for node in data.issues.nodes {
                let identifier = node.identifier.clone();
                match decode_issue(node) {
                    Ok(issue) => issues.push(issue),
                    Err(err) => warn!(%identifier, error = %err, "skipping unreadable issue"),
                }
            }
            let page_info = data.issues.page_info;
            match page_info.end_cursor {
                Some(cursor) if page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }
        Ok(issues)
    }
}

fn decode_issue(node: IssueNode) -> RemoteResult<IssueRecord> {
    node.into_record()
        .map_err(|message| RemoteError::decode(SERVICE, message))
}

#[async_trait]
impl IssueTracker for LinearIssueTracker {
    async fn list_teams(&self) -> RemoteResult<Vec<Team>> {
        let data: TeamsData = self.execute(wire::TEAMS_QUERY, json!({})).await?;
        data.teams
            .nodes
            .into_iter()
            .map(|node| {
                node.into_team()
                    .map_err(|message| RemoteError::decode(SERVICE, message))
            })
            .collect()
    }

    async fn list_workflow_states(&self, team: &TeamId) -> RemoteResult<Vec<WorkflowState>> {
        let data: StatesData = self
            .execute(wire::STATES_QUERY, json!({ "teamId": team.as_str() }))
            .await?;
        data.workflow_states
            .nodes
            .into_iter()
            .map(|node| {
                node.into_state()
                    .map_err(|message| RemoteError::decode(SERVICE, message))
            })
            .collect()
    }

    async fn list_issues(&self, scope: &IssueScope) -> RemoteResult<Vec<IssueRecord>> {
        let filter = match scope {
            IssueScope::All => Value::Null,
            IssueScope::Team(team) => json!({ "team": { "id": { "eq": team.as_str() } } }),
        };
        self.issues_matching(filter).await
    }

    async fn find_issue(&self, key: &IssueKey) -> RemoteResult<Option<IssueRecord>> {
        let filter = json!({
            "team": { "key": { "eq": key.team_prefix() } },
            "number": { "eq": key.number() },
        });
        let issues = self.issues_matching(filter).await?;
        Ok(issues.into_iter().find(|issue| issue.key() == key))
    }

    async fn create_issue(&self, draft: &IssueDraft) -> RemoteResult<IssueRecord> {
        let variables = json!({ "input": wire::create_input(draft) });
        let data: CreateData = self.execute(wire::CREATE_MUTATION, variables).await?;
        let payload = data.issue_create;
        match payload.issue {
            Some(node) if payload.success => decode_issue(node),
            _ => Err(RemoteError::Query {
                service: SERVICE,
                message: format!("issue create was not accepted: {}", draft.title),
            }),
        }
    }

    async fn update_issue(&self, id: &IssueId, patch: &IssuePatch) -> RemoteResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let variables = json!({ "id": id.as_str(), "input": wire::update_input(patch) });
        let data: UpdateData = self.execute(wire::UPDATE_MUTATION, variables).await?;
        if !data.issue_update.success {
            return Err(RemoteError::Query {
                service: SERVICE,
                message: format!("issue update was not accepted: {id}"),
            });
        }
        Ok(())
    }
}
