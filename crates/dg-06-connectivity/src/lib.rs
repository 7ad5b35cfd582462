//! # Connectivity Monitor (dg-06)
//!
//! Keeps the peer table's `connected` set as close as possible to the
//! target peer set supplied by discovery.
//!
//! Each tick, every known peer that is not connected gets one handshake
//! attempt, bounded by `handshake_timeout`. Failures are expected during a
//! partition: the peer stays `unknown`/`disconnected` and is tried again
//! next tick. Nothing is ever blacklisted here.
//!
//! Transport signals (`Connected`, `Disconnected`) are applied immediately
//! through [`ConnectivityMonitor::on_inbound_connection`] and
//! [`ConnectivityMonitor::on_disconnect`]. Every transition into or out of
//! `connected` publishes a peer event on the bus; the gossip engine reacts
//! to `PeerConnected` with a catch-up advertisement. Each tick ends with a
//! `PeersRefreshed` event.

pub mod config;
pub mod error;
pub mod service;

pub use config::ConnectivityConfig;
pub use error::ConnectivityError;
pub use service::{ConnectivityMonitor, TickReport};
