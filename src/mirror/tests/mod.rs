//! Unit tests for the mirror bounded context.

mod support;
