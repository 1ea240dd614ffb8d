//! Runs every sync operation in sequence and prints a summary.

use std::process::ExitCode;
use tasksync::cli::{self, Operation};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run(Operation::DailySync).await
}
