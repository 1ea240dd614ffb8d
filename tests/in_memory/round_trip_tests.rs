//! Both mirror directions over one shared state.

use crate::in_memory::helpers::{engineering, store, task, tracker};
use rstest::rstest;
use std::sync::Arc;
use tasksync::mirror::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskStore},
    domain::{IssueDraft, TaskPriority, TaskRecord, TaskStatus},
    ports::IssueTracker,
    services::{IssueToTaskSync, TaskToIssueSync},
};

fn forward(
    store: &InMemoryTaskStore,
    tracker: &InMemoryIssueTracker,
) -> TaskToIssueSync<InMemoryTaskStore, InMemoryIssueTracker> {
    TaskToIssueSync::new(Arc::new(store.clone()), Arc::new(tracker.clone()))
}

fn backward(
    store: &InMemoryTaskStore,
    tracker: &InMemoryIssueTracker,
) -> IssueToTaskSync<InMemoryTaskStore, InMemoryIssueTracker> {
    IssueToTaskSync::new(Arc::new(store.clone()), Arc::new(tracker.clone()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mirrored_tasks_are_stable_in_both_directions(tracker: InMemoryIssueTracker) {
    let store = InMemoryTaskStore::with_tasks(vec![
        task(1, "Fix login")
            .with_status(TaskStatus::InProgress)
            .with_priority(TaskPriority::High),
        task(2, "Write docs"),
        task(3, "Close out").with_status(TaskStatus::Done),
    ]);

    let first = forward(&store, &tracker).run().await.expect("forward run");
    let back = backward(&store, &tracker).run().await.expect("backward run");
    let again = forward(&store, &tracker).run().await.expect("second forward run");

    assert_eq!(first.created(), 3);
    assert_eq!(back.created(), 0);
    assert_eq!(back.updated(), 0);
    assert_eq!(back.skipped(), 3);
    assert_eq!(again.created(), 0);
    assert_eq!(again.updated(), 0);
    assert_eq!(store.snapshot().expect("snapshot").len(), 3);
    assert_eq!(tracker.snapshot().expect("snapshot").len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issues_created_in_the_tracker_flow_back_once(
    store: InMemoryTaskStore,
    tracker: InMemoryIssueTracker,
) {
    tracker
        .create_issue(&IssueDraft::new(engineering().id().clone(), "Raised in tracker"))
        .await
        .expect("seed issue");

    let first = backward(&store, &tracker).run().await.expect("first run");
    let second = backward(&store, &tracker).run().await.expect("second run");
    let forward_report = forward(&store, &tracker).run().await.expect("forward run");

    assert_eq!(first.created(), 1);
    assert_eq!(second.created(), 0);
    assert_eq!(forward_report.created(), 0);
    let tasks: Vec<TaskRecord> = store.snapshot().expect("snapshot");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tracker.snapshot().expect("snapshot").len(), 1);
}
