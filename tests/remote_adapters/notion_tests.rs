//! Task store adapter against a mock REST server.

use serde_json::{Value, json};
use tasksync::mirror::{
    adapters::notion::{NotionSettings, NotionTaskStore},
    domain::{TaskDraft, TaskId, TaskPatch, TaskPriority, TaskStatus},
    ports::{RemoteError, TaskStore},
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DATABASE: &str = "db-tasks";
const TOKEN: &str = "secret-notion";

fn store(server: &MockServer) -> NotionTaskStore {
    let mut settings = NotionSettings::new(TOKEN).with_base_url(server.uri());
    settings.database_id = DATABASE.to_owned();
    NotionTaskStore::new(settings).expect("client builds")
}

fn page(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "Name": { "type": "title", "title": [{ "plain_text": title }] },
            "Status": { "type": "select", "select": { "name": status } },
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn list_tasks_follows_query_cursors() {
    let server = MockServer::start().await;
    let query_path = format!("/databases/{DATABASE}/query");
    Mock::given(method("POST"))
        .and(path(query_path.as_str()))
        .and(body_partial_json(json!({ "start_cursor": "cursor-2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("task-2", "Second", "Done")],
            "has_more": false,
            "next_cursor": null,
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(query_path.as_str()))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("notion-version", "2022-06-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": "task-1",
                "properties": {
                    "Name": { "type": "title", "title": [{ "plain_text": "First" }] },
                    "Status": { "type": "status", "status": { "name": "In Progress" } },
                    "Priority": { "type": "select", "select": { "name": "Sky high" } },
                    "Linear Issue": {
                        "type": "rich_text",
                        "rich_text": [{ "plain_text": "ENG-7 - https://tracker.invalid/ENG-7" }]
                    },
                    "Due Date": { "type": "date", "date": { "start": "2026-11-02" } },
                    "Assignee": { "type": "people", "people": [{ "name": "Codex" }] },
                }
            }],
            "has_more": true,
            "next_cursor": "cursor-2",
        })))
        .with_priority(5)
        .expect(1)
        .mount(&server)
        .await;

    let tasks = store(&server).list_tasks().await.expect("listing succeeds");

    let titles: Vec<&str> = tasks.iter().map(|task| task.title()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    let first = tasks.first().expect("first task");
    assert_eq!(first.status(), TaskStatus::InProgress);
    assert_eq!(first.priority(), Some(TaskPriority::Medium));
    assert_eq!(
        first.issue_key().map(ToString::to_string).as_deref(),
        Some("ENG-7")
    );
    assert_eq!(
        first.due_date().map(|due| due.to_string()).as_deref(),
        Some("2026-11-02")
    );
    assert_eq!(first.assignees(), ["Codex".to_owned()]);
    let second = tasks.get(1).expect("second task");
    assert_eq!(second.priority(), None);
    assert_eq!(second.status(), TaskStatus::Done);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_page_is_skipped_and_the_rest_load() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/databases/{DATABASE}/query").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                page("task-1", "First", "Todo"),
                page("  ", "Blank id", "Todo"),
                page("task-3", "Third", "Done"),
            ],
            "has_more": false,
            "next_cursor": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = store(&server).list_tasks().await.expect("listing succeeds");

    let ids: Vec<&str> = tasks.iter().map(|task| task.id().as_str()).collect();
    assert_eq!(ids, vec!["task-1", "task-3"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_task_sends_typed_properties() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": DATABASE },
            "properties": {
                "Name": { "title": [{ "text": { "content": "Fix login" } }] },
                "Status": { "select": { "name": "In Review" } },
                "Priority": { "select": { "name": "High" } },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "task-9",
            "Fix login",
            "In Review",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = TaskDraft::new("Fix login");
    draft.status = TaskStatus::InReview;
    draft.priority = Some(TaskPriority::High);
    let created = store(&server).create_task(&draft).await.expect("create succeeds");

    assert_eq!(created.id().as_str(), "task-9");
    assert_eq!(created.status(), TaskStatus::InReview);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_task_patches_only_named_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/pages/task-3"))
        .and(body_partial_json(json!({
            "properties": {
                "Status": { "select": { "name": "Done" } },
                "Assignee": { "people": [{ "name": "Gemini" }] },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "task-3" })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = TaskPatch::new()
        .with_status(TaskStatus::Done)
        .with_assignee("Gemini");
    let id = TaskId::new("task-3").expect("valid id");

    store(&server)
        .update_task(&id, &patch)
        .await
        .expect("update succeeds");
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_write_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(ResponseTemplate::new(400).set_body_string("validation_error"))
        .mount(&server)
        .await;

    let err = store(&server)
        .create_task(&TaskDraft::new("Broken"))
        .await
        .expect_err("create is rejected");

    assert!(matches!(
        err,
        RemoteError::Rejected { status: 400, ref body, .. } if body == "validation_error"
    ));
}
