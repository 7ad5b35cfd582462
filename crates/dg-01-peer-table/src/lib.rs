//! # Peer Table (dg-01)
//!
//! Tracks known peers and the state of the live connection to each one.
//!
//! ```text
//!            begin_connect            mark_connected
//!  unknown ───────────────→ connecting ──────────────→ connected
//!     ↑                        │   │                       │
//!     └── handshake failed ────┘   │ handshake failed      │ mark_disconnected
//!         (never connected)        ↓ (seen before)         ↓
//!                             disconnected ←───────────────┘
//! ```
//!
//! Peers are never deleted. A peer that drops out stays in the table as
//! `disconnected` so the connectivity monitor can reconnect it and the
//! gossip engine keeps its "already has it" bookkeeping.
//!
//! All transitions happen under a single write lock, so readers never see
//! a peer halfway between two states.

pub mod domain;

pub use domain::{PeerRecord, PeerState, PeerTable, PeerTableError};
