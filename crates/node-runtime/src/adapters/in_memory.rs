//! # In-Memory Transport
//!
//! A process-local network used by the local-network binary and the
//! integration suite.
//!
//! Every node registers an endpoint and receives its inbound
//! [`TransportEvent`]s on an unbounded channel. Links are symmetric: a
//! successful handshake from either end connects both ends, and the passive
//! end is told through `TransportEvent::Connected`.
//!
//! A link can be cut with [`InMemoryNetwork::disconnect`]. Cutting emits
//! `Disconnected` to both ends and makes further handshakes between the pair
//! fail until [`InMemoryNetwork::connect`] restores it. Restoring does not
//! connect anything by itself; the connectivity monitors do that on their
//! next tick.
//!
//! Messages go through the bincode wire codec on the way.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use shared_types::{GossipMessage, PeerId, Transport, TransportError, TransportEvent, TransportEvents};

/// Unordered pair key.
fn link(a: PeerId, b: PeerId) -> (PeerId, PeerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Default)]
struct NetworkState {
    endpoints: HashMap<PeerId, mpsc::UnboundedSender<TransportEvent>>,
    cut: HashSet<(PeerId, PeerId)>,
    live: HashSet<(PeerId, PeerId)>,
}

impl NetworkState {
    fn deliver(&self, to: &PeerId, event: TransportEvent) -> bool {
        match self.endpoints.get(to) {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    fn drop_link(&mut self, a: PeerId, b: PeerId) -> bool {
        if !self.live.remove(&link(a, b)) {
            return false;
        }
        self.deliver(&a, TransportEvent::Disconnected { peer: b });
        self.deliver(&b, TransportEvent::Disconnected { peer: a });
        true
    }
}

/// The shared medium all in-memory endpoints attach to.
#[derive(Default)]
pub struct InMemoryNetwork {
    state: Mutex<NetworkState>,
}

impl InMemoryNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach an endpoint for `id`.
    ///
    /// Registering an id again replaces its endpoint (a node restart) and
    /// drops its old links.
    pub fn register(self: &Arc<Self>, id: PeerId) -> (Arc<InMemoryTransport>, TransportEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut state = self.state.lock();
            Self::drop_links_of(&mut state, id);
            state.endpoints.insert(id, tx);
        }
        let transport = Arc::new(InMemoryTransport {
            id,
            network: Arc::clone(self),
        });
        (transport, rx)
    }

    /// Detach `id`; its peers see a disconnect.
    pub fn unregister(&self, id: &PeerId) {
        let mut state = self.state.lock();
        Self::drop_links_of(&mut state, *id);
        state.endpoints.remove(id);
    }

    /// Cut the link between `a` and `b`.
    pub fn disconnect(&self, a: PeerId, b: PeerId) {
        let mut state = self.state.lock();
        state.cut.insert(link(a, b));
        if state.drop_link(a, b) {
            info!("[net] Link {} <-> {} cut", a, b);
        }
    }

    /// Allow `a` and `b` to handshake again.
    pub fn connect(&self, a: PeerId, b: PeerId) {
        if self.state.lock().cut.remove(&link(a, b)) {
            info!("[net] Link {} <-> {} restored", a, b);
        }
    }

    pub fn is_cut(&self, a: PeerId, b: PeerId) -> bool {
        self.state.lock().cut.contains(&link(a, b))
    }

    pub fn is_linked(&self, a: PeerId, b: PeerId) -> bool {
        self.state.lock().live.contains(&link(a, b))
    }

    fn drop_links_of(state: &mut NetworkState, id: PeerId) {
        let peers: Vec<PeerId> = state
            .live
            .iter()
            .filter_map(|(a, b)| match (*a == id, *b == id) {
                (true, _) => Some(*b),
                (_, true) => Some(*a),
                _ => None,
            })
            .collect();
        for peer in peers {
            state.drop_link(id, peer);
        }
    }
}

/// One node's endpoint on an [`InMemoryNetwork`].
pub struct InMemoryTransport {
    id: PeerId,
    network: Arc<InMemoryNetwork>,
}

#[async_trait]
impl Transport for InMemoryTransport {
    fn local_id(&self) -> PeerId {
        self.id
    }

    async fn connect(&self, peer: &PeerId) -> Result<(), TransportError> {
        let mut state = self.network.state.lock();
        if !state.endpoints.contains_key(&self.id) {
            return Err(TransportError::Closed);
        }
        let key = link(self.id, *peer);
        if *peer == self.id || state.cut.contains(&key) || !state.endpoints.contains_key(peer) {
            return Err(TransportError::Unreachable(*peer));
        }

        if state.live.insert(key) && !state.deliver(peer, TransportEvent::Connected { peer: self.id }) {
            state.live.remove(&key);
            return Err(TransportError::Unreachable(*peer));
        }
        Ok(())
    }

    async fn send(&self, peer: &PeerId, message: GossipMessage) -> Result<(), TransportError> {
        let bytes = message.encode()?;
        let message = GossipMessage::decode(&bytes)?;

        let state = self.network.state.lock();
        if !state.live.contains(&link(self.id, *peer)) {
            return Err(TransportError::NotConnected(*peer));
        }
        if !state.deliver(
            peer,
            TransportEvent::Message {
                from: self.id,
                message,
            },
        ) {
            return Err(TransportError::Closed);
        }
        Ok(())
    }

    async fn disconnect(&self, peer: &PeerId) -> Result<(), TransportError> {
        if self.network.state.lock().drop_link(self.id, *peer) {
            debug!("[net] {} closed link to {}", self.id, peer);
        }
        Ok(())
    }
}
