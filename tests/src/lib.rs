//! # DAG-Gossip Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Polling helpers over the node observability hooks
//! └── integration/      # Multi-node scenarios on the in-memory network
//!     ├── propagation.rs
//!     ├── partition.rs
//!     └── concurrency.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dg-tests
//! RUST_LOG=debug cargo test -p dg-tests integration::partition
//! ```

pub mod harness;
pub mod integration;
