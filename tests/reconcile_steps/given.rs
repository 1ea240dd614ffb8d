//! Given steps for reconciliation BDD scenarios.

use super::world::ReconcileWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasksync::mirror::{
    adapters::memory::InMemoryTaskStore,
    domain::{Team, TeamId, TaskId, TaskPriority, TaskRecord, TaskStatus},
};

fn numbered_id(n: u32) -> Result<TaskId, eyre::Report> {
    TaskId::new(format!("{n:08x}-0000-4000-8000-00000000bdd0")).wrap_err("construct task id")
}

fn add_task(world: &mut ReconcileWorld, task: TaskRecord) -> Result<(), eyre::Report> {
    let mut tasks = world
        .store
        .snapshot()
        .map_err(|err| eyre::eyre!("task snapshot failed: {err}"))?;
    tasks.push(task);
    world.store = InMemoryTaskStore::with_tasks(tasks);
    Ok(())
}

#[given(r#"an issue tracker team "{key}""#)]
fn tracker_team(world: &mut ReconcileWorld, key: String) -> Result<(), eyre::Report> {
    let id = TeamId::new(format!("team-{}", key.to_ascii_lowercase()))
        .wrap_err("construct team id")?;
    world.tracker = world.tracker.clone().with_team(Team::new(id, "Engineering", key));
    Ok(())
}

#[given(r#"a task "{title}" with status "{status}" and priority "{priority}""#)]
fn task_with_fields(
    world: &mut ReconcileWorld,
    title: String,
    status: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let parsed_status = TaskStatus::from_label(&status)
        .ok_or_else(|| eyre::eyre!("unknown status {status}"))?;
    let parsed_priority = TaskPriority::from_label(&priority)
        .ok_or_else(|| eyre::eyre!("unknown priority {priority}"))?;
    let next = u32::try_from(world.store.snapshot().map_or(0, |tasks| tasks.len()))
        .wrap_err("task count fits u32")?;
    let task = TaskRecord::new(numbered_id(next.saturating_add(1))?, title)
        .with_status(parsed_status)
        .with_priority(parsed_priority);
    add_task(world, task)
}

#[given("{count:u32} numbered tasks")]
fn numbered_tasks(world: &mut ReconcileWorld, count: u32) -> Result<(), eyre::Report> {
    for n in 1..=count {
        add_task(world, TaskRecord::new(numbered_id(n)?, format!("Task {n}")))?;
    }
    Ok(())
}

#[given(r#"the issue tracker rejects issues titled "{title}""#)]
fn tracker_rejects(world: &mut ReconcileWorld, title: String) {
    world.tracker = world.tracker.clone().rejecting_creates_titled(title);
}
