//! # Gossip Wire Messages
//!
//! The push-pull protocol has three messages:
//!
//! ```text
//! origin ──Advertise{hash}──→ peer
//! origin ←──Request{id,hash}── peer        (only if hash unknown and not in flight)
//! origin ──Response{id,block}─→ peer       (block = None means NotFound)
//! ```
//!
//! Messages are bincode-encoded with a hard size limit.

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::entities::{Block, Hash, PeerId};
use crate::errors::CodecError;

/// Upper bound for a single encoded message.
pub const MAX_MESSAGE_BYTES: u64 = 16 * 1024 * 1024;

/// Messages exchanged by gossip engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GossipMessage {
    /// "I have block `hash`."
    Advertise { hash: Hash, sender: PeerId },
    /// "Send me block `hash`."
    Request { request_id: u64, hash: Hash },
    /// Answer to a `Request`.
    Response {
        request_id: u64,
        hash: Hash,
        block: Option<Block>,
    },
}

impl GossipMessage {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Advertise { .. } => "advertise",
            Self::Request { .. } => "request",
            Self::Response { .. } => "response",
        }
    }

    /// Encode for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec()
            .serialize(self)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode from the wire, enforcing [`MAX_MESSAGE_BYTES`].
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        codec()
            .deserialize(bytes)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Encoded size of a block, used for the gossip size limit.
pub fn encoded_block_size(block: &Block) -> usize {
    codec()
        .serialized_size(block)
        .map(|size| size as usize)
        .unwrap_or(usize::MAX)
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_MESSAGE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NodeId;

    #[test]
    fn test_response_survives_the_wire() {
        let genesis = Block::genesis("wire");
        let block = Block::new(vec![genesis.hash], NodeId::from_seed(1), 1, 5, vec![]);
        let message = GossipMessage::Response {
            request_id: 9,
            hash: block.hash,
            block: Some(block.clone()),
        };

        let decoded = GossipMessage::decode(&message.encode().unwrap()).unwrap();
        assert_eq!(decoded, message);
        assert!(encoded_block_size(&block) > 0);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = GossipMessage::decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
