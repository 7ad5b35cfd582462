//! # Block Gossip Engine (dg-05)
//!
//! Spreads block hashes to connected peers and pulls full blocks on demand
//! until every reachable node holds the same DAG.
//!
//! ## Protocol
//!
//! ```text
//! [Proposer (4)] ──announce──→ [GossipEngine (5)]
//!                                     │
//!                                     ↓ Advertise{hash} to connected peers,
//!                             ┌───────┴───────┐  minus sender and known holders
//!                             ↓               ↓
//!                        [Peer A]        [Peer B]
//!                             │
//!                             └──Request{hash}──→ advertiser
//!                                 ←──Response{block | NotFound}
//! ```
//!
//! 1. New local or newly stored block: advertise to every connected peer
//!    except the one it came from and those known to hold it.
//! 2. Advertisement for a known or already-pending hash: record the sender
//!    as a holder (and as a fallback source) and stop.
//! 3. Request: answer with the block or `NotFound`.
//! 4. Response: store it. Missing parents park the block in the orphan
//!    pool and fetch the parents first (bounded depth); each successful
//!    store re-drives the orphans waiting on it and re-advertises.
//!
//! A request that times out or fails moves on to the next advertiser of
//! the same hash. After `max_fetch_attempts` the hash waits in the retry
//! queue until the next peer-table refresh (a connect or a monitor tick).
//! A block that is dropped takes its waiting orphans with it.

pub mod domain;
pub mod events;
pub mod service;

pub use domain::{FetchTable, GossipConfig, GossipStats, NextAttempt, Orphan, OrphanPool};
pub use events::GossipError;
pub use service::GossipEngine;
