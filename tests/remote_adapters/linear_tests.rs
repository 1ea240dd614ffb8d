//! Issue tracker adapter against a mock GraphQL endpoint.

use serde_json::{Value, json};
use tasksync::mirror::{
    adapters::linear::{LinearIssueTracker, LinearSettings},
    domain::{IssueDraft, IssueId, IssueKey, IssuePatch, PriorityRank, StateCategory, TeamId},
    ports::{IssueScope, IssueTracker, RemoteError},
};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "lin_api_secret";

fn tracker(server: &MockServer) -> LinearIssueTracker {
    let settings = LinearSettings::new(TOKEN).with_api_url(server.uri());
    LinearIssueTracker::new(settings).expect("client builds")
}

fn issue_node(id: &str, identifier: &str, priority: i64) -> Value {
    json!({
        "id": id,
        "identifier": identifier,
        "title": format!("Issue {identifier}"),
        "description": null,
        "priority": priority,
        "dueDate": null,
        "url": format!("https://tracker.invalid/issue/{identifier}"),
        "assignee": null,
        "team": { "id": "team-eng" },
        "state": { "id": "state-progress", "name": "In Progress", "type": "started" },
    })
}

fn issues_page(nodes: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "data": {
            "issues": {
                "nodes": nodes,
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
            }
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn list_teams_sends_raw_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", TOKEN))
        .and(body_string_contains("teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "teams": { "nodes": [
                { "id": "team-eng", "name": "Engineering", "key": "ENG" }
            ] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let teams = tracker(&server).list_teams().await.expect("teams load");

    let keys: Vec<&str> = teams.iter().map(|team| team.key()).collect();
    assert_eq!(keys, vec!["ENG"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_issues_walks_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-1" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(issues_page(vec![issue_node("id-2", "ENG-2", 0)], None)),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("issues("))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues_page(
            vec![issue_node("id-1", "ENG-1", 2)],
            Some("cursor-1"),
        )))
        .with_priority(5)
        .expect(1)
        .mount(&server)
        .await;

    let issues = tracker(&server)
        .list_issues(&IssueScope::All)
        .await
        .expect("issues load");

    let keys: Vec<String> = issues.iter().map(|issue| issue.key().to_string()).collect();
    assert_eq!(keys, vec!["ENG-1", "ENG-2"]);
    let first = issues.first().expect("first issue");
    assert_eq!(first.priority(), Some(PriorityRank::HIGH));
    assert_eq!(
        first.state().map(|state| state.category()),
        Some(StateCategory::Started)
    );
    let second = issues.get(1).expect("second issue");
    assert_eq!(second.priority(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_issue_is_skipped_and_the_rest_load() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("issues("))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues_page(
            vec![
                issue_node("id-1", "ENG-1", 2),
                issue_node("id-2", "OPS2-9", 2),
                issue_node("id-3", "ENG-3", 2),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let issues = tracker(&server)
        .list_issues(&IssueScope::All)
        .await
        .expect("issues load");

    let keys: Vec<String> = issues.iter().map(|issue| issue.key().to_string()).collect();
    assert_eq!(keys, vec!["ENG-1", "ENG-3"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn find_issue_filters_by_team_key_and_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "filter": {
                "team": { "key": { "eq": "ENG" } },
                "number": { "eq": 42 },
            } }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(issues_page(vec![issue_node("id-42", "ENG-42", 3)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let key = IssueKey::new("ENG-42").expect("valid key");
    let found = tracker(&server).find_issue(&key).await.expect("lookup runs");

    assert_eq!(found.map(|issue| issue.id().to_string()).as_deref(), Some("id-42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn graphql_errors_become_query_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Entity not found" }, { "message": "Try again" }],
        })))
        .mount(&server)
        .await;

    let err = tracker(&server)
        .list_teams()
        .await
        .expect_err("errors surface");

    assert!(matches!(
        err,
        RemoteError::Query { ref message, .. } if message == "Entity not found; Try again"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_issue_sends_only_present_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "input": {
                "teamId": "team-eng",
                "title": "Fix login",
                "priority": 1,
            } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "issueCreate": {
                "success": true,
                "issue": issue_node("id-5", "ENG-5", 1),
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = IssueDraft::new(TeamId::new("team-eng").expect("valid team"), "Fix login");
    draft.priority = Some(PriorityRank::URGENT);
    let created = tracker(&server).create_issue(&draft).await.expect("create runs");

    assert_eq!(created.key().to_string(), "ENG-5");
}

#[tokio::test(flavor = "multi_thread")]
async fn unaccepted_update_is_a_query_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "id": "id-8", "input": { "priority": 0 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "issueUpdate": { "success": false, "issue": null } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = IssuePatch::new().with_priority(None);
    let id = IssueId::new("id-8").expect("valid id");
    let err = tracker(&server)
        .update_issue(&id, &patch)
        .await
        .expect_err("update is refused");

    assert!(matches!(err, RemoteError::Query { .. }));
}
