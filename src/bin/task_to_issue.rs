//! Pushes task store changes into the issue tracker.

use std::process::ExitCode;
use tasksync::cli::{self, Operation};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run(Operation::TaskToIssue).await
}
