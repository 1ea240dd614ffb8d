//! Application services for task assignment.

mod assignment;

pub use assignment::{AssignmentError, AssignmentReport, AssignmentResult, AssignmentService};
