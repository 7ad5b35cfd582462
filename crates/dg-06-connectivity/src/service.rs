//! # Connectivity Monitor Service

use crate::config::ConnectivityConfig;
use crate::error::ConnectivityError;
use dg_01_peer_table::{PeerTable, PeerTableError};
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{DiscoverySource, PeerId, Transport};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub attempted: usize,
    pub connected: usize,
    pub failed: usize,
}

/// Reconciles the peer table against the discovery target set.
pub struct ConnectivityMonitor<T, D, P>
where
    T: Transport + ?Sized,
    D: DiscoverySource + ?Sized,
    P: EventPublisher + ?Sized,
{
    config: ConnectivityConfig,
    peers: Arc<PeerTable>,
    transport: Arc<T>,
    discovery: Arc<D>,
    bus: Arc<P>,
}

impl<T, D, P> ConnectivityMonitor<T, D, P>
where
    T: Transport + ?Sized,
    D: DiscoverySource + ?Sized,
    P: EventPublisher + ?Sized,
{
    pub fn new(
        config: ConnectivityConfig,
        peers: Arc<PeerTable>,
        transport: Arc<T>,
        discovery: Arc<D>,
        bus: Arc<P>,
    ) -> Self {
        Self {
            config,
            peers,
            transport,
            discovery,
            bus,
        }
    }

    /// One reconciliation pass.
    pub async fn tick(&self) -> TickReport {
        for peer in self.discovery.target_peers() {
            match self.peers.register(peer) {
                Ok(_) | Err(PeerTableError::SelfConnection) => {}
                Err(e) => warn!("[dg-06] Cannot register {}: {}", peer, e),
            }
        }

        let mut report = TickReport::default();
        for peer in self.peers.peers_needing_connection() {
            // An inbound connection may have landed since the snapshot.
            if self.peers.begin_connect(&peer).is_err() {
                continue;
            }
            report.attempted += 1;

            match self.handshake(&peer).await {
                Ok(()) => {
                    report.connected += 1;
                    self.connected(peer).await;
                }
                Err(e) => {
                    report.failed += 1;
                    self.peers.mark_handshake_failed(&peer);
                    debug!("[dg-06] {}", e);
                }
            }
        }

        if report.attempted > 0 {
            debug!(
                "[dg-06] Tick: {} attempted, {} connected, {} failed ({} live)",
                report.attempted,
                report.connected,
                report.failed,
                self.peers.connected_count()
            );
        }
        self.bus
            .publish(NodeEvent::PeersRefreshed {
                connected: self.peers.connected_count(),
            })
            .await;
        report
    }

    /// Tick on the configured period until `shutdown` flips to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.tick_period());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "[dg-06] Connectivity monitor started (period {:?})",
            self.config.tick_period()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[dg-06] Connectivity monitor stopped");
    }

    /// Transport reported a lost connection.
    pub async fn on_disconnect(&self, peer: PeerId) {
        if self.peers.mark_disconnected(&peer) {
            self.bus.publish(NodeEvent::PeerDisconnected { peer }).await;
        }
    }

    /// A remote peer completed a handshake with us.
    pub async fn on_inbound_connection(&self, peer: PeerId) {
        self.connected(peer).await;
    }

    async fn handshake(&self, peer: &PeerId) -> Result<(), ConnectivityError> {
        match time::timeout(self.config.handshake_timeout(), self.transport.connect(peer)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ConnectivityError::HandshakeFailure {
                peer: *peer,
                reason: e.to_string(),
            }),
            Err(_) => Err(ConnectivityError::HandshakeFailure {
                peer: *peer,
                reason: "timed out".to_string(),
            }),
        }
    }

    async fn connected(&self, peer: PeerId) {
        match self.peers.mark_connected(peer) {
            Ok(true) => {
                self.bus.publish(NodeEvent::PeerConnected { peer }).await;
            }
            Ok(false) => {}
            Err(e) => warn!("[dg-06] Ignoring connection from {}: {}", peer, e),
        }
    }
}
