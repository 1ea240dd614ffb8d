//! In-memory adapters for the mirror ports, with failure injection.

mod issue_tracker;
mod pull_requests;
mod task_store;

pub use issue_tracker::{InMemoryIssueTracker, default_workflow};
pub use pull_requests::InMemoryPullRequests;
pub use task_store::InMemoryTaskStore;

use crate::mirror::ports::RemoteError;

fn poisoned(err: impl std::fmt::Display) -> RemoteError {
    RemoteError::transport(std::io::Error::other(err.to_string()))
}

fn rejected(service: &'static str, body: impl Into<String>) -> RemoteError {
    RemoteError::Rejected {
        service,
        status: 400,
        body: body.into(),
    }
}
