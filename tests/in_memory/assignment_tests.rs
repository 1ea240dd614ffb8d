//! Capacity-bounded assignment against live workloads.

use crate::in_memory::helpers::{engineering, task, tracker};
use rstest::rstest;
use std::sync::Arc;
use tasksync::mirror::{
    adapters::memory::{InMemoryIssueTracker, InMemoryTaskStore},
    domain::{IssueId, IssueKey, IssueRecord, TaskStatus},
};
use tasksync::workload::{
    domain::{AgentName, Assignment, Capacity, Roster},
    services::AssignmentService,
};

fn agent(name: &str) -> AgentName {
    AgentName::new(name).expect("valid agent")
}

fn assigned_issue(key: &str, assignee: &str) -> IssueRecord {
    IssueRecord::new(
        IssueId::new(format!("id-{key}")).expect("valid id"),
        IssueKey::new(key).expect("valid key"),
        "Tracked work",
    )
    .with_team(engineering().id().clone())
    .with_assignee(assignee)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stops_once_every_agent_is_full() {
    let store = InMemoryTaskStore::with_tasks([
        task(1, "Existing").with_assignees(["Alpha".to_owned()]),
        task(2, "Open one"),
        task(3, "Open two"),
        task(4, "Open three"),
        task(5, "Open four"),
    ]);
    let tracker = InMemoryIssueTracker::new()
        .with_team(engineering())
        .with_issues([assigned_issue("ENG-40", "Beta Bot")]);

    let report = AssignmentService::new(Arc::new(store.clone()), Arc::new(tracker))
        .with_roster(Roster::parse("Alpha,Beta").expect("valid roster"))
        .with_capacity(Capacity::new(2))
        .run()
        .await
        .expect("assignment runs");

    let agents: Vec<&AgentName> = report
        .assignments()
        .iter()
        .map(Assignment::agent)
        .collect();
    assert_eq!(agents, vec![&agent("Alpha"), &agent("Beta")]);
    assert_eq!(report.left_unassigned(), 2);
    assert_eq!(report.workload().load_of(&agent("Alpha")), Some(2));
    assert_eq!(report.workload().load_of(&agent("Beta")), Some(2));

    let still_open = store
        .snapshot()
        .expect("snapshot")
        .iter()
        .filter(|record| record.is_unassigned())
        .count();
    assert_eq!(still_open, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_work_does_not_count_toward_load(tracker: InMemoryIssueTracker) {
    let store = InMemoryTaskStore::with_tasks([
        task(1, "Shipped")
            .with_status(TaskStatus::Done)
            .with_assignees(["Alpha".to_owned()]),
        task(2, "Next up"),
    ]);

    let report = AssignmentService::new(Arc::new(store), Arc::new(tracker))
        .with_roster(Roster::parse("Alpha").expect("valid roster"))
        .with_capacity(Capacity::new(1))
        .run()
        .await
        .expect("assignment runs");

    assert_eq!(report.assigned(), 1);
    assert_eq!(report.left_unassigned(), 0);
}
