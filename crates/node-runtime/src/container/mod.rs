//! # Node Container
//!
//! Configuration and the assembled per-node component graph.
//!
//! ## Wiring
//!
//! ```text
//!   Transport ──events──→ inbound loop ──┬─→ ConnectivityMonitor (dg-06)
//!                                        └─→ GossipEngine (dg-05)
//!
//!   ConnectivityMonitor ──PeerConnected──→ Event Bus ──→ catch_up + retry_queued
//!   ConnectivityMonitor ──PeersRefreshed─→ Event Bus ──→ retry_queued
//!   GossipEngine        ──BlockStored────→ Event Bus ──→ DeployMempool::remove_included
//!   Proposer (dg-04)    ──BlockAnnouncer─→ GossipEngine::announce_local
//! ```

pub mod config;
pub mod node;

pub use config::{LoggingConfig, NetworkConfig, NodeConfig};
pub use node::{Node, NodeError, NodeGossip, NodeMonitor};
