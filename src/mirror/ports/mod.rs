//! Port contracts for the three remote systems.
//!
//! Every adapter reports failures through [`RemoteError`], so services treat
//! a rejected create the same whichever system rejected it.

pub mod issue_tracker;
pub mod pull_requests;
pub mod remote;
pub mod task_store;

pub use issue_tracker::{IssueScope, IssueTracker};
pub use pull_requests::{PullRequestQuery, PullRequestSource};
pub use remote::{RemoteError, RemoteResult};
pub use task_store::TaskStore;

#[cfg(test)]
pub use issue_tracker::MockIssueTracker;
