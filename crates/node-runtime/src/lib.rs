//! # DAG-Gossip Node Runtime
//!
//! Assembles the components into running nodes.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the per-node component graph
//! - `adapters/` - Port implementations (in-memory transport, discovery,
//!   proposer announcer)
//! - `handlers/` - Inbound transport routing and bus choreography
//! - `local_network` - Multi-node topologies on one in-memory network
//! - `telemetry` - `tracing` subscriber setup
//!
//! ## Components
//!
//! 1. Peer Table (dg-01) - Connection state per peer
//! 2. Block Store (dg-02) - Content-addressed DAG
//! 3. Deploy Pool (dg-03) - Pending deploys
//! 4. Proposer (dg-04) - Block production
//! 5. Gossip (dg-05) - Push-pull block propagation
//! 6. Connectivity (dg-06) - Peer reconciliation and partition recovery

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod local_network;
pub mod telemetry;

pub use container::{Node, NodeConfig, NodeError};
pub use local_network::{local_node_id, LocalNetwork};
