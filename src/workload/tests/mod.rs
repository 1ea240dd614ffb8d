//! Unit tests for the workload bounded context.
