//! # Adapter Implementations
//!
//! Concrete implementations of the ports the components depend on:
//!
//! - [`InMemoryNetwork`] / [`InMemoryTransport`]: the `Transport` port
//! - [`StaticDiscovery`]: the `DiscoverySource` port
//! - [`GossipAnnouncer`]: the proposer's `BlockAnnouncer` port

pub mod announcer;
pub mod discovery;
pub mod in_memory;

pub use announcer::GossipAnnouncer;
pub use discovery::StaticDiscovery;
pub use in_memory::{InMemoryNetwork, InMemoryTransport};
