//! # Transport and Discovery Ports
//!
//! The node consumes a reliable, ordered, peer-to-peer message channel. The
//! host provides the concrete implementation; components only depend on
//! these traits.
//!
//! Inbound traffic (`onMessage`, `onDisconnect`) is delivered as
//! [`TransportEvent`]s on an unbounded channel handed out by the
//! implementation when the local endpoint is created.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::entities::PeerId;
use crate::errors::TransportError;
use crate::wire::GossipMessage;

/// Signals raised by the transport for the local node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A remote peer completed a handshake with us.
    Connected { peer: PeerId },
    /// A message arrived from a connected peer.
    Message { from: PeerId, message: GossipMessage },
    /// A connection was lost.
    Disconnected { peer: PeerId },
}

/// Receiving side of the transport's inbound channel.
pub type TransportEvents = mpsc::UnboundedReceiver<TransportEvent>;

/// Peer-to-peer message channel.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the gossip engine and the
/// connectivity monitor share one instance across tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identity of the local endpoint.
    fn local_id(&self) -> PeerId;

    /// Perform a connection handshake with `peer`.
    async fn connect(&self, peer: &PeerId) -> Result<(), TransportError>;

    /// Send a message to a connected peer.
    async fn send(&self, peer: &PeerId, message: GossipMessage) -> Result<(), TransportError>;

    /// Close the connection to `peer`, if any.
    async fn disconnect(&self, peer: &PeerId) -> Result<(), TransportError>;
}

/// Supplier of the target peer set (static configuration or discovery).
pub trait DiscoverySource: Send + Sync {
    /// Peers this node should try to stay connected to.
    fn target_peers(&self) -> Vec<PeerId>;
}
