//! # Runtime Handlers
//!
//! Long-running loops spawned by [`crate::Node::start`]:
//!
//! - [`InboundHandler`]: routes transport events to the monitor and the
//!   gossip engine
//! - [`ChoreographyHandler`]: reacts to bus events across components

pub mod choreography;
pub mod inbound;

pub use choreography::ChoreographyHandler;
pub use inbound::InboundHandler;
