//! Mirrors open and recently closed pull requests into tasks.

use std::process::ExitCode;
use tasksync::cli::{self, Operation};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run(Operation::PullRequestSync).await
}
