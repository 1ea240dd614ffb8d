//! Assigns unassigned tasks to the least-loaded agents.

use std::process::ExitCode;
use tasksync::cli::{self, Operation};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run(Operation::AssignTasks).await
}
