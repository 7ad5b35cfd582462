//! The peer table itself.

use super::{PeerRecord, PeerState, PeerTableError};
use parking_lot::RwLock;
use shared_types::PeerId;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Known peers and their connection state.
///
/// ## Thread Safety
///
/// One `RwLock` guards the whole mapping. Share it across tasks via `Arc`.
pub struct PeerTable {
    local_id: PeerId,
    peers: RwLock<BTreeMap<PeerId, PeerRecord>>,
}

impl PeerTable {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            peers: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn local_id(&self) -> PeerId {
        self.local_id
    }

    /// Insert a discovered peer as `unknown`.
    ///
    /// Returns `true` if the peer was not in the table before.
    pub fn register(&self, peer: PeerId) -> Result<bool, PeerTableError> {
        if peer == self.local_id {
            return Err(PeerTableError::SelfConnection);
        }

        let mut peers = self.peers.write();
        if peers.contains_key(&peer) {
            return Ok(false);
        }
        peers.insert(peer, PeerRecord::new(peer));
        debug!("[dg-01] Registered peer {}", peer);
        Ok(true)
    }

    /// Move a peer into `connecting` before a handshake.
    pub fn begin_connect(&self, peer: &PeerId) -> Result<(), PeerTableError> {
        let mut peers = self.peers.write();
        let record = peers.get_mut(peer).ok_or(PeerTableError::PeerNotFound)?;

        if !record.state.needs_connection() {
            return Err(PeerTableError::InvalidTransition {
                from: record.state,
                to: PeerState::Connecting,
            });
        }
        record.state = PeerState::Connecting;
        record.connect_attempts += 1;
        Ok(())
    }

    /// Record a completed handshake (outbound or inbound).
    ///
    /// Unregistered peers are inserted on the spot, since inbound
    /// connections may come from peers discovery has not reported yet.
    /// Returns `true` if the peer was not already connected.
    pub fn mark_connected(&self, peer: PeerId) -> Result<bool, PeerTableError> {
        if peer == self.local_id {
            return Err(PeerTableError::SelfConnection);
        }

        let mut peers = self.peers.write();
        let record = peers.entry(peer).or_insert_with(|| PeerRecord::new(peer));
        if record.state == PeerState::Connected {
            return Ok(false);
        }

        let from = record.state;
        record.state = PeerState::Connected;
        record.last_connected = Some(Instant::now());
        info!("[dg-01] Peer {} {} -> connected", peer, from);
        Ok(true)
    }

    /// Record a lost connection.
    ///
    /// Returns `true` if the peer was `connected`. A peer that was only
    /// `connecting` also moves to `disconnected` (or back to `unknown` if it
    /// never completed a handshake) but the call returns `false`.
    pub fn mark_disconnected(&self, peer: &PeerId) -> bool {
        let mut peers = self.peers.write();
        let Some(record) = peers.get_mut(peer) else {
            return false;
        };

        match record.state {
            PeerState::Connected => {
                record.state = PeerState::Disconnected;
                info!("[dg-01] Peer {} connected -> disconnected", peer);
                true
            }
            PeerState::Connecting => {
                record.state = Self::resting_state(record);
                false
            }
            PeerState::Unknown | PeerState::Disconnected => false,
        }
    }

    /// Record a failed or timed out handshake.
    ///
    /// Only applies to peers in `connecting`; an inbound connection that won
    /// the race is left alone.
    pub fn mark_handshake_failed(&self, peer: &PeerId) {
        let mut peers = self.peers.write();
        if let Some(record) = peers.get_mut(peer) {
            if record.state == PeerState::Connecting {
                record.state = Self::resting_state(record);
                record.failed_attempts += 1;
            }
        }
    }

    pub fn state_of(&self, peer: &PeerId) -> Option<PeerState> {
        self.peers.read().get(peer).map(|r| r.state)
    }

    pub fn is_connected(&self, peer: &PeerId) -> bool {
        self.state_of(peer) == Some(PeerState::Connected)
    }

    /// Currently connected peers, in id order.
    pub fn connected_peers(&self) -> Vec<PeerId> {
        self.peers
            .read()
            .values()
            .filter(|r| r.state == PeerState::Connected)
            .map(|r| r.peer)
            .collect()
    }

    pub fn connected_count(&self) -> usize {
        self.peers
            .read()
            .values()
            .filter(|r| r.state == PeerState::Connected)
            .count()
    }

    /// Peers in `unknown` or `disconnected`.
    pub fn peers_needing_connection(&self) -> Vec<PeerId> {
        self.peers
            .read()
            .values()
            .filter(|r| r.state.needs_connection())
            .map(|r| r.peer)
            .collect()
    }

    /// Consistent copy of every record.
    pub fn snapshot(&self) -> Vec<PeerRecord> {
        self.peers.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    fn resting_state(record: &PeerRecord) -> PeerState {
        if record.ever_connected() {
            PeerState::Disconnected
        } else {
            PeerState::Unknown
        }
    }
}
