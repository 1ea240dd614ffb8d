//! The daily driver over in-memory systems.

use crate::in_memory::helpers::{FixedClock, clock, engineering, task};
use rstest::rstest;
use std::sync::Arc;
use tasksync::daily::{ASSIGN_TASKS, DailySync, ISSUE_TO_TASK, PR_SYNC, StepOutcome, TASK_TO_ISSUE};
use tasksync::mirror::{
    adapters::memory::{InMemoryIssueTracker, InMemoryPullRequests, InMemoryTaskStore},
    domain::{PullRequestNumber, PullRequestRecord, TaskStatus},
};

type Driver = DailySync<InMemoryTaskStore, InMemoryIssueTracker, InMemoryPullRequests, FixedClock>;

fn driver(store: &InMemoryTaskStore, tracker: &InMemoryIssueTracker, clock: FixedClock) -> Driver {
    DailySync::new(
        Arc::new(store.clone()),
        Arc::new(tracker.clone()),
        Arc::new(clock),
    )
}

fn open_pull(number: u64, title: &str) -> PullRequestRecord {
    PullRequestRecord::new(
        PullRequestNumber::new(number).expect("valid number"),
        title,
        format!("https://git.invalid/acme/widgets/pull/{number}"),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn runs_every_step_in_order(clock: FixedClock) {
    let store = InMemoryTaskStore::with_tasks([task(1, "Fix login"), task(2, "Write docs")]);
    let tracker = InMemoryIssueTracker::new().with_team(engineering());
    let pulls = InMemoryPullRequests::new([open_pull(7, "Add cache")]);

    let summary = driver(&store, &tracker, clock)
        .with_pull_requests(Arc::new(pulls))
        .run()
        .await;

    let names: Vec<&str> = summary.steps().iter().map(|step| step.name).collect();
    assert_eq!(names, vec![TASK_TO_ISSUE, ISSUE_TO_TASK, PR_SYNC, ASSIGN_TASKS]);
    assert!(!summary.has_fatal());

    let outcomes: Vec<&StepOutcome> = summary.steps().iter().map(|step| &step.outcome).collect();
    let Some(StepOutcome::Synced(forward)) = outcomes.first() else {
        panic!("expected a sync report, got {outcomes:?}");
    };
    assert_eq!(forward.created(), 2);
    let Some(StepOutcome::Assigned(assignment)) = outcomes.last() else {
        panic!("expected an assignment report, got {outcomes:?}");
    };
    assert_eq!(assignment.assigned(), 3);

    let tasks = store.snapshot().expect("snapshot");
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().any(|record| record.status() == TaskStatus::InReview));
    assert!(tasks.iter().all(|record| !record.is_unassigned()));

    let rendered = summary.render().expect("summary renders");
    assert!(rendered.starts_with("daily sync started 2026-10-17T06:00:00+00:00"));
    assert!(rendered.contains("task-to-issue: created=2 updated=0"));
    assert!(rendered.contains("assign-tasks: assigned=3"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_pull_request_source_only_fails_its_step(clock: FixedClock) {
    let store = InMemoryTaskStore::with_tasks([task(1, "Fix login")]);
    let tracker = InMemoryIssueTracker::new().with_team(engineering());

    let summary = driver(&store, &tracker, clock)
        .without_pull_requests("GITHUB_TOKEN is not set")
        .run()
        .await;

    assert!(summary.has_fatal());
    let fatal: Vec<&str> = summary
        .steps()
        .iter()
        .filter(|step| matches!(step.outcome, StepOutcome::Fatal(_)))
        .map(|step| step.name)
        .collect();
    assert_eq!(fatal, vec![PR_SYNC]);
    assert_eq!(tracker.snapshot().expect("snapshot").len(), 1);

    let rendered = summary.render().expect("summary renders");
    assert!(rendered.contains("pr-sync: failed: GITHUB_TOKEN is not set"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tracker_without_teams_is_fatal_for_writing_steps(clock: FixedClock) {
    let store = InMemoryTaskStore::with_tasks([task(1, "Fix login")]);
    let tracker = InMemoryIssueTracker::new();

    let summary = driver(&store, &tracker, clock)
        .with_pull_requests(Arc::new(InMemoryPullRequests::default()))
        .run()
        .await;

    let first = summary.steps().first().expect("first step");
    assert_eq!(first.name, TASK_TO_ISSUE);
    assert!(matches!(first.outcome, StepOutcome::Fatal(_)));
    assert_eq!(summary.steps().len(), 4);
    assert!(tracker.snapshot().expect("snapshot").is_empty());
}
