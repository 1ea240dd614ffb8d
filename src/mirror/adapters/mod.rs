//! Adapter implementations for mirror ports.

pub mod github;
mod http;
pub mod linear;
pub mod memory;
pub mod notion;
