//! # Block Proposer (dg-04)
//!
//! Turns pending deploys into a block whose parents are the current DAG
//! tips, stores it and hands it to the announcer.
//!
//! ```text
//! [caller] ──propose()──→ mpsc ──→ [Proposer task] ──put──→ [BlockStore]
//!    ↑                                   │
//!    └──────────── oneshot ──────────────┤
//!                                        └──announce_block──→ [GossipEngine]
//! ```
//!
//! Every request goes through one task per node, so sequence numbers and
//! the tip set used as parents are never read concurrently by two
//! proposals.

pub mod config;
pub mod error;
pub mod ports;
pub mod service;

pub use config::ProposerConfig;
pub use error::ProposerError;
pub use ports::BlockAnnouncer;
pub use service::{Proposer, ProposerHandle};
