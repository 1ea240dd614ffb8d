//! Then steps for reconciliation BDD scenarios.

use super::world::ReconcileWorld;
use rstest_bdd_macros::then;
use tasksync::mirror::{
    domain::{IssueRecord, PriorityRank, WorkflowState},
    services::MirrorError,
};

fn issues(world: &ReconcileWorld) -> Result<Vec<IssueRecord>, eyre::Report> {
    world
        .tracker
        .snapshot()
        .map_err(|err| eyre::eyre!("issue snapshot failed: {err}"))
}

fn expect_created(world: &ReconcileWorld, count: u32) -> Result<(), eyre::Report> {
    let report = world.last_report()?;
    if report.created() != count {
        return Err(eyre::eyre!(
            "expected {count} created, report says {report}"
        ));
    }
    let stored = issues(world)?.len();
    if stored != usize::try_from(count)? {
        return Err(eyre::eyre!("expected {count} stored issues, found {stored}"));
    }
    Ok(())
}

#[then("1 issue is created")]
fn one_issue_created(world: &ReconcileWorld) -> Result<(), eyre::Report> {
    expect_created(world, 1)
}

#[then("{count:u32} issues are created")]
fn issues_created(world: &ReconcileWorld, count: u32) -> Result<(), eyre::Report> {
    expect_created(world, count)
}

#[then(r#"the issue "{title}" is in state "{state}" with priority {rank:i64}"#)]
fn issue_has_fields(
    world: &ReconcileWorld,
    title: String,
    state: String,
    rank: i64,
) -> Result<(), eyre::Report> {
    let found = issues(world)?
        .into_iter()
        .find(|issue| issue.title() == title)
        .ok_or_else(|| eyre::eyre!("no issue titled {title}"))?;
    let actual_state = found.state().map(WorkflowState::name);
    if actual_state != Some(state.as_str()) {
        return Err(eyre::eyre!("expected state {state}, found {actual_state:?}"));
    }
    let expected_rank = PriorityRank::new(rank)?;
    if found.priority() != Some(expected_rank) {
        return Err(eyre::eyre!(
            "expected priority {expected_rank}, found {:?}",
            found.priority()
        ));
    }
    Ok(())
}

#[then(r#"the task "{title}" carries the issue cross-reference"#)]
fn task_is_linked(world: &ReconcileWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    let issue = issues(world)?
        .into_iter()
        .find(|candidate| candidate.title() == title)
        .ok_or_else(|| eyre::eyre!("no issue titled {title}"))?;
    if task.issue_key() != Some(issue.key()) {
        return Err(eyre::eyre!(
            "expected task to reference {}, found {:?}",
            issue.key(),
            task.issue_key()
        ));
    }
    Ok(())
}

#[then("the last run created {created:u32} and skipped {skipped:u32}")]
fn last_run_counts(
    world: &ReconcileWorld,
    created: u32,
    skipped: u32,
) -> Result<(), eyre::Report> {
    let report = world.last_report()?;
    if report.created() != created || report.skipped() != skipped {
        return Err(eyre::eyre!(
            "expected created={created} skipped={skipped}, report says {report}"
        ));
    }
    Ok(())
}

#[then(r#"the only failure is for the task "{title}""#)]
fn single_failure(world: &ReconcileWorld, title: String) -> Result<(), eyre::Report> {
    let report = world.last_report()?;
    let task = world.task_titled(&title)?;
    let failed: Vec<&str> = report.errors().iter().map(|e| e.record()).collect();
    if failed != vec![task.id().as_str()] {
        return Err(eyre::eyre!("expected only {} to fail, found {failed:?}", task.id()));
    }
    Ok(())
}

#[then("the sync fails because no teams exist")]
fn sync_failed_without_teams(world: &ReconcileWorld) -> Result<(), eyre::Report> {
    match world.results.last() {
        Some(Err(MirrorError::NoTeams)) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("unexpected error: {err}")),
        Some(Ok(report)) => Err(eyre::eyre!("expected failure, report says {report}")),
        None => Err(eyre::eyre!("no sync has run in this scenario")),
    }
}

#[then("no issues exist")]
fn no_issues(world: &ReconcileWorld) -> Result<(), eyre::Report> {
    let stored = issues(world)?;
    if !stored.is_empty() {
        return Err(eyre::eyre!("expected no issues, found {}", stored.len()));
    }
    Ok(())
}
