//! Domain errors for the peer table.

use super::PeerState;
use std::fmt;

/// Errors raised by [`PeerTable`](super::PeerTable) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerTableError {
    /// Peer is not in the table.
    PeerNotFound,
    /// Attempted to add the local node to its own table.
    SelfConnection,
    /// The requested transition is not allowed from the current state.
    InvalidTransition { from: PeerState, to: PeerState },
}

impl fmt::Display for PeerTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerNotFound => write!(f, "Peer not found in peer table"),
            Self::SelfConnection => write!(f, "Cannot add local node to peer table"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid peer transition from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for PeerTableError {}
