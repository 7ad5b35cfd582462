//! Connectivity errors.

use shared_types::PeerId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    /// Handshake refused, failed or timed out. Retried next tick.
    #[error("Handshake with {peer} failed: {reason}")]
    HandshakeFailure { peer: PeerId, reason: String },
}
