//! Pull request source adapter for the REST API.

use super::http::send_json;
use crate::mirror::{
    domain::{PullRequestNumber, PullRequestRecord, PullRequestState, RepositoryFullName},
    ports::{PullRequestQuery, PullRequestSource, RemoteError, RemoteResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

const SERVICE: &str = "github";
const USER_AGENT: &str = concat!("tasksync/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";
const PAGE_SIZE: usize = 100;

/// Default REST base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connection settings for the pull request source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    /// REST base URL without a trailing slash.
    pub api_url: String,
    /// Personal access token.
    pub token: String,
    /// Repository whose pull requests are mirrored.
    pub repository: RepositoryFullName,
}

impl GitHubSettings {
    /// Creates settings for `repository` against the public API.
    #[must_use]
    pub fn new(token: impl Into<String>, repository: RepositoryFullName) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: token.into(),
            repository,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_owned();
        self
    }
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    title: String,
    body: Option<String>,
    state: String,
    merged_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    html_url: String,
}

impl PullRequestPayload {
    fn into_record(self) -> RemoteResult<PullRequestRecord> {
        let number = PullRequestNumber::new(self.number)
            .map_err(|err| RemoteError::decode(SERVICE, err.to_string()))?;
        let mut record = PullRequestRecord::new(number, self.title, self.html_url);
        if let Some(body) = self.body {
            record = record.with_body(body);
        }
        record = match (self.merged_at, self.closed_at) {
            (Some(merged), _) => record.merged_at(merged),
            (None, Some(closed)) => record.closed_at(closed),
            (None, None) if self.state == PullRequestState::Closed.as_str() => {
                return Err(RemoteError::decode(
                    SERVICE,
                    format!("closed pull request #{number} has no closing time"),
                ));
            }
            (None, None) => record,
        };
        Ok(record)
    }
}

/// HTTP-backed [`PullRequestSource`].
#[derive(Debug, Clone)]
pub struct GitHubPullRequests {
    client: Client,
    settings: GitHubSettings,
}

impl GitHubPullRequests {
    /// Creates a client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(settings: GitHubSettings) -> RemoteResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(RemoteError::transport)?;
        Ok(Self { client, settings })
    }

    async fn page(&self, query: PullRequestQuery, page: u32) -> RemoteResult<Vec<PullRequestPayload>> {
        let url = format!(
            "{}/repos/{}/pulls",
            self.settings.api_url, self.settings.repository
        );
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.settings.token))
            .header(reqwest::header::ACCEPT, ACCEPT)
            .query(&[
                ("state", query.state().as_str().to_owned()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ]);
        if let PullRequestQuery::ClosedSince(_) = query {
            request = request.query(&[("sort", "updated"), ("direction", "desc")]);
        }
        send_json(SERVICE, request).await
    }
}

#[async_trait]
impl PullRequestSource for GitHubPullRequests {
    async fn list_pull_requests(
        &self,
        query: PullRequestQuery,
    ) -> RemoteResult<Vec<PullRequestRecord>> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let payloads = self.page(query, page).await?;
            let fetched = payloads.len();
            debug!(state = %query.state(), page, count = fetched, "fetched pull request page");
            // Closed listings arrive newest-updated first, and a pull request
            // cannot close after its last update.
            let past_window = match query {
                PullRequestQuery::ClosedSince(cutoff) => payloads
                    .iter()
                    .any(|payload| payload.updated_at.is_some_and(|at| at <= cutoff)),
                PullRequestQuery::Open => false,
            };
            for payload in payloads {
                let number = payload.number;
                match payload.into_record() {
                    Ok(record) if query.admits(&record) => records.push(record),
                    Ok(_) => {}
                    Err(err) => warn!(number, error = %err, "skipping unreadable pull request"),
                }
            }
            if fetched < PAGE_SIZE || past_window {
                break;
            }
            page += 1;
        }
        Ok(records)
    }
}
