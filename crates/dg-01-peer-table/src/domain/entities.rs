//! Peer entities.

use shared_types::PeerId;
use std::fmt;
use std::time::Instant;

/// Connection state of a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerState {
    /// Known from discovery, never connected.
    Unknown,
    /// Handshake in progress.
    Connecting,
    /// Live connection.
    Connected,
    /// Was connected at least once, connection is gone.
    Disconnected,
}

impl PeerState {
    /// Whether the connectivity monitor should try to (re)connect.
    pub fn needs_connection(self) -> bool {
        matches!(self, Self::Unknown | Self::Disconnected)
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Everything the table knows about one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub peer: PeerId,
    pub state: PeerState,
    /// Handshakes started by us.
    pub connect_attempts: u64,
    /// Handshakes that failed or timed out.
    pub failed_attempts: u64,
    /// Last time the peer entered `connected`.
    pub last_connected: Option<Instant>,
}

impl PeerRecord {
    pub fn new(peer: PeerId) -> Self {
        Self {
            peer,
            state: PeerState::Unknown,
            connect_attempts: 0,
            failed_attempts: 0,
            last_connected: None,
        }
    }

    /// Whether this peer has ever completed a handshake.
    pub fn ever_connected(&self) -> bool {
        self.last_connected.is_some()
    }
}
