//! When steps for reconciliation BDD scenarios.

use super::world::ReconcileWorld;
use rstest_bdd_macros::when;

#[when("the task to issue sync runs")]
fn sync_runs(world: &mut ReconcileWorld) {
    world.run_sync();
}

#[when("the task to issue sync runs again")]
fn sync_runs_again(world: &mut ReconcileWorld) {
    world.run_sync();
}
