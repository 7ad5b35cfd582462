//! # Integration Scenarios
//!
//! Each scenario starts a [`node_runtime::LocalNetwork`], drives it through
//! the client operations and asserts on what every node ends up storing.

pub mod concurrency;
pub mod partition;
pub mod propagation;
