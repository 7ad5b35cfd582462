//! Error types for the gossip engine.

use shared_types::{short_hex, Hash, PeerId, TransportError};
use thiserror::Error;

/// Block gossip errors. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GossipError {
    #[error("Block not found at peer: {}", short_hex(.0))]
    NotFound(Hash),

    #[error("Request for block {} to {peer} timed out", short_hex(.hash))]
    Timeout { hash: Hash, peer: PeerId },

    #[error("Block too large: {size} bytes (max: {max})")]
    BlockTooLarge { size: usize, max: usize },

    #[error("Peer sent a block that does not match {}", short_hex(.0))]
    InvalidBlock(Hash),

    #[error("Ancestry of {} deeper than {depth}", short_hex(.hash))]
    AncestryTooDeep { hash: Hash, depth: usize },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
