//! # Shared Types Crate
//!
//! This crate contains the domain entities, the gossip wire messages and the
//! transport/discovery ports shared by every component of the node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-component types are defined here.
//! - **Content Addressing**: Blocks and deploys are identified by the SHA-256
//!   hash of their contents; a hash never changes once computed.
//! - **Transport Agnostic**: Components only see the [`Transport`] port; the
//!   concrete network lives in the runtime.

pub mod entities;
pub mod errors;
pub mod transport;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use transport::{DiscoverySource, Transport, TransportEvent, TransportEvents};
pub use wire::{encoded_block_size, GossipMessage, MAX_MESSAGE_BYTES};

#[cfg(test)]
mod tests {
    use super::{encoded_block_size, Block, GossipMessage, MAX_MESSAGE_BYTES};

    #[test]
    fn test_block_size_is_reachable_from_crate_root() {
        let block = Block::genesis("root-exports");
        let size = encoded_block_size(&block);
        assert!(size > 0);
        assert!((size as u64) < MAX_MESSAGE_BYTES);

        // A response carries the block plus its envelope.
        let response = GossipMessage::Response {
            request_id: 1,
            hash: block.hash,
            block: Some(block),
        };
        assert!(response.encode().unwrap().len() > size);
    }
}
