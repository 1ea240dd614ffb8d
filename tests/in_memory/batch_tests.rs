//! One rejected record never stops its batch.

use crate::in_memory::helpers::{engineering, task, task_id};
use std::sync::Arc;
use tasksync::mirror::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskStore},
    domain::RecordState,
    services::TaskToIssueSync,
};

#[tokio::test(flavor = "multi_thread")]
async fn rejected_create_is_isolated_to_its_task() {
    let store = InMemoryTaskStore::with_tasks((1..=5).map(|n| task(n, &format!("Task {n}"))));
    let tracker = InMemoryIssueTracker::new()
        .with_team(engineering())
        .rejecting_creates_titled("Task 3");

    let report = TaskToIssueSync::new(Arc::new(store.clone()), Arc::new(tracker.clone()))
        .run()
        .await
        .expect("batch runs");

    let third = task_id(3);
    assert_eq!(report.created(), 4);
    let failed: Vec<&str> = report.errors().iter().map(|failure| failure.record()).collect();
    assert_eq!(failed, vec![third.as_str()]);
    assert_eq!(
        report.state_of(third.as_str()),
        Some(RecordState::Failed { attempts: 1 })
    );
    assert_eq!(report.state_of(task_id(4).as_str()), Some(RecordState::Synced));
    assert_eq!(tracker.snapshot().expect("snapshot").len(), 4);

    let linked = store
        .snapshot()
        .expect("snapshot")
        .iter()
        .filter(|record| record.issue_key().is_some())
        .count();
    assert_eq!(linked, 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_task_is_retried_on_the_next_run() {
    let store = InMemoryTaskStore::with_tasks((1..=3).map(|n| task(n, &format!("Task {n}"))));
    let healthy = InMemoryIssueTracker::new().with_team(engineering());
    let rejecting = healthy.clone().rejecting_creates_titled("Task 2");

    let first = TaskToIssueSync::new(Arc::new(store.clone()), Arc::new(rejecting.clone()))
        .run()
        .await
        .expect("first run");
    let second = TaskToIssueSync::new(Arc::new(store.clone()), Arc::new(healthy.clone()))
        .run()
        .await
        .expect("second run");

    assert_eq!(first.created(), 2);
    assert_eq!(second.created(), 1);
    assert!(second.is_clean());
    assert_eq!(healthy.snapshot().expect("snapshot").len(), 3);
    assert_eq!(
        second.state_of(task_id(2).as_str()),
        Some(RecordState::Synced)
    );
}
