//! # Error Types
//!
//! Errors that cross component boundaries (transport and wire codec).

use crate::entities::PeerId;
use thiserror::Error;

/// Errors raised by a [`crate::Transport`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The remote peer could not be reached (handshake refused or link down).
    #[error("Peer unreachable: {0}")]
    Unreachable(PeerId),

    /// There is no live connection to the peer.
    #[error("Not connected to peer: {0}")]
    NotConnected(PeerId),

    /// The local endpoint has been shut down.
    #[error("Transport closed")]
    Closed,

    /// The message could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Wire codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("Failed to encode message: {0}")]
    Encode(String),

    /// Deserialization failed or the payload exceeded the size limit.
    #[error("Failed to decode message: {0}")]
    Decode(String),
}
