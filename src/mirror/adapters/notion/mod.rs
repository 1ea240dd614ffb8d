//! Task store adapter for the document-database REST API.
//!
//! Tasks are pages in one database. Reads go through the paginated
//! database query endpoint; writes send typed property bags.

mod wire;

use super::http::{send, send_json};
use crate::mirror::{
    domain::{TaskDraft, TaskId, TaskPatch, TaskRecord},
    ports::{RemoteError, RemoteResult, TaskStore},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};
use wire::{Page, QueryPage};

const SERVICE: &str = "notion";

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
/// Default API version header value.
pub const DEFAULT_VERSION: &str = "2022-06-28";
/// Default tasks database.
pub const DEFAULT_TASKS_DATABASE_ID: &str = "15d0e156-c881-4c12-8d9b-b2c8371d5acc";

const PAGE_SIZE: u32 = 100;

/// Connection settings for the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionSettings {
    /// REST base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token.
    pub token: String,
    /// `Notion-Version` header value.
    pub version: String,
    /// Database holding the tasks.
    pub database_id: String,
}

impl NotionSettings {
    /// Creates settings for `token` against the public API defaults.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: token.into(),
            version: DEFAULT_VERSION.to_owned(),
            database_id: DEFAULT_TASKS_DATABASE_ID.to_owned(),
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

/// HTTP-backed [`TaskStore`].
#[derive(Debug, Clone)]
pub struct NotionTaskStore {
    client: Client,
    settings: NotionSettings,
}

impl NotionTaskStore {
    /// Creates a client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(settings: NotionSettings) -> RemoteResult<Self> {
        let client = Client::builder().build().map_err(RemoteError::transport)?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.settings.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.settings.token)
            .header("Notion-Version", &self.settings.version)
    }

    async fn query_page(&self, cursor: Option<&str>) -> RemoteResult<QueryPage> {
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let (Some(value), Some(object)) = (cursor, body.as_object_mut()) {
            object.insert("start_cursor".to_owned(), Value::from(value));
        }
        let path = format!("/databases/{}/query", self.settings.database_id);
        send_json(
            SERVICE,
            self.request(reqwest::Method::POST, &path).json(&body),
        )
        .await
    }
}

fn decode(page: Page) -> RemoteResult<TaskRecord> {
    page.into_record()
        .map_err(|message| RemoteError::decode(SERVICE, message))
}

#[async_trait]
impl TaskStore for NotionTaskStore {
    async fn list_tasks(&self) -> RemoteResult<Vec<TaskRecord>> {
        let mut tasks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            debug!(count = page.results.len(), "fetched task page");
            for result in page.results {
                let page_id = result.id.clone();
                match decode(result) {
                    Ok(task) => tasks.push(task),
                    Err(err) => warn!(%page_id, error = %err, "skipping unreadable task page"),
                }
            }
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(tasks)
    }

    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<TaskRecord> {
        let body = json!({
            "parent": { "database_id": self.settings.database_id },
            "properties": wire::draft_properties(draft),
        });
        let page: Page = send_json(
            SERVICE,
            self.request(reqwest::Method::POST, "/pages").json(&body),
        )
        .await?;
        decode(page)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> RemoteResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let body = json!({ "properties": wire::patch_properties(patch) });
        let path = format!("/pages/{id}");
        send(
            SERVICE,
            self.request(reqwest::Method::PATCH, &path).json(&body),
        )
        .await?;
        Ok(())
    }
}
