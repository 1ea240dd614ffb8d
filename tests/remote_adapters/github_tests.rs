//! Pull request source against a mock REST server.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tasksync::mirror::{
    adapters::github::{GitHubPullRequests, GitHubSettings},
    domain::{PullRequestNumber, PullRequestState, RepositoryFullName},
    ports::{PullRequestQuery, PullRequestSource, RemoteError},
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PULLS_PATH: &str = "/repos/acme/widgets/pulls";

fn source(server: &MockServer) -> GitHubPullRequests {
    let repository = RepositoryFullName::new("acme/widgets").expect("valid repository");
    let settings = GitHubSettings::new("ghp_secret", repository).with_api_url(server.uri());
    GitHubPullRequests::new(settings).expect("client builds")
}

fn cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 10, 0, 0, 0)
        .single()
        .expect("valid cutoff")
}

fn closed(number: u64, at: &str) -> Value {
    let mut value = payload(number, "closed");
    value["closed_at"] = json!(at);
    value["updated_at"] = json!(at);
    value
}

fn payload(number: u64, state: &str) -> Value {
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "body": null,
        "state": state,
        "merged_at": null,
        "closed_at": null,
        "html_url": format!("https://git.invalid/acme/widgets/pull/{number}"),
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn walks_pages_until_a_short_one() {
    let server = MockServer::start().await;
    let full: Vec<Value> = (1..=100).map(|number| payload(number, "open")).collect();
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(header("authorization", "token ghp_secret"))
        .and(query_param("state", "open"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![payload(101, "open")]))
        .expect(1)
        .mount(&server)
        .await;

    let pulls = source(&server)
        .list_pull_requests(PullRequestQuery::Open)
        .await
        .expect("listing succeeds");

    assert_eq!(pulls.len(), 101);
    assert!(pulls.iter().all(|pull| pull.state() == PullRequestState::Open));
}

#[tokio::test(flavor = "multi_thread")]
async fn decodes_merged_and_closed_pull_requests() {
    let server = MockServer::start().await;
    let mut merged = payload(5, "closed");
    merged["merged_at"] = json!("2026-10-16T12:00:00Z");
    merged["closed_at"] = json!("2026-10-16T12:00:00Z");
    let mut closed = payload(6, "closed");
    closed["closed_at"] = json!("2026-10-15T08:30:00Z");
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("state", "closed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![merged, closed]))
        .mount(&server)
        .await;

    let pulls = source(&server)
        .list_pull_requests(PullRequestQuery::ClosedSince(cutoff()))
        .await
        .expect("listing succeeds");

    let merged_flags: Vec<bool> = pulls.iter().map(|pull| pull.is_merged()).collect();
    assert_eq!(merged_flags, vec![true, false]);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_pull_request_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![payload(9, "closed"), closed(10, "2026-10-16T09:00:00Z")]),
        )
        .mount(&server)
        .await;

    let pulls = source(&server)
        .list_pull_requests(PullRequestQuery::ClosedSince(cutoff()))
        .await
        .expect("listing succeeds");

    let numbers: Vec<PullRequestNumber> = pulls.iter().map(|pull| pull.number()).collect();
    assert_eq!(numbers, vec![PullRequestNumber::new(10).expect("valid number")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_listing_stops_at_the_window_edge() {
    let server = MockServer::start().await;
    let mut first: Vec<Value> = (1..=99)
        .map(|number| closed(number, "2026-10-16T12:00:00Z"))
        .collect();
    first.push(closed(100, "2026-09-01T12:00:00Z"));
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("state", "closed"))
        .and(query_param("sort", "updated"))
        .and(query_param("direction", "desc"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .expect(0)
        .mount(&server)
        .await;

    let pulls = source(&server)
        .list_pull_requests(PullRequestQuery::ClosedSince(cutoff()))
        .await
        .expect("listing succeeds");

    assert_eq!(pulls.len(), 99);
    assert!(pulls.iter().all(|pull| pull.state() == PullRequestState::Closed));
}

#[tokio::test(flavor = "multi_thread")]
async fn unauthorized_listing_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let err = source(&server)
        .list_pull_requests(PullRequestQuery::Open)
        .await
        .expect_err("listing is rejected");

    assert!(matches!(err, RemoteError::Rejected { status: 401, .. }));
}
