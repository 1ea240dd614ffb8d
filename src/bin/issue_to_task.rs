//! Pulls issue tracker changes back into the task store.

use std::process::ExitCode;
use tasksync::cli::{self, Operation};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run(Operation::IssueToTask).await
}
