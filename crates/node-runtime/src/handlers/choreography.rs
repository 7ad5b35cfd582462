//! # Choreography Handler
//!
//! ## Flow
//!
//! 1. ConnectivityMonitor connects a peer → publishes `PeerConnected`
//! 2. Handler advertises the local DAG to that peer (catch-up) and restarts
//!    fetches waiting in the gossip retry queue
//! 3. Every monitor tick publishes `PeersRefreshed` → handler restarts the
//!    retry queue again, so a lost response on a stable link is recovered
//! 4. GossipEngine stores a block received from a peer → publishes `BlockStored`
//! 5. Handler drops the block's deploys from the local mempool

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use shared_bus::{EventStream, NodeEvent};
use shared_types::{short_hex, Hash, PeerId};

use dg_02_block_store::BlockStore;
use dg_03_deploy_pool::DeployMempool;

use crate::container::NodeGossip;

/// Cross-component reactions to bus events.
pub struct ChoreographyHandler {
    events: EventStream,
    gossip: Arc<NodeGossip>,
    store: Arc<BlockStore>,
    mempool: Arc<DeployMempool>,
}

impl ChoreographyHandler {
    /// The subscription must be created before any component can publish,
    /// or early events are missed.
    pub fn new(
        events: EventStream,
        gossip: Arc<NodeGossip>,
        store: Arc<BlockStore>,
        mempool: Arc<DeployMempool>,
    ) -> Self {
        Self {
            events,
            gossip,
            store,
            mempool,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[runtime] Choreography handler started");
        loop {
            tokio::select! {
                event = self.events.next() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle(event).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[runtime] Choreography handler stopped");
    }

    async fn handle(&self, event: NodeEvent) {
        match event {
            NodeEvent::PeerConnected { peer } => self.on_peer_connected(peer).await,
            NodeEvent::PeersRefreshed { .. } => self.on_peers_refreshed(),
            NodeEvent::BlockStored {
                hash,
                source: Some(_),
            } => self.on_remote_block(hash),
            _ => {}
        }
    }

    async fn on_peer_connected(&self, peer: PeerId) {
        self.gossip.catch_up(peer).await;
        self.gossip.retry_queued();
    }

    fn on_peers_refreshed(&self) {
        let restarted = self.gossip.retry_queued();
        if restarted > 0 {
            debug!("[runtime] Restarted {} queued fetch(es)", restarted);
        }
    }

    fn on_remote_block(&self, hash: Hash) {
        let Ok(block) = self.store.get(&hash) else {
            return;
        };
        let removed = self.mempool.remove_included(&block.deploys);
        if removed > 0 {
            debug!(
                "[runtime] Block {} included {} pending deploy(s)",
                short_hex(&hash),
                removed
            );
        }
    }
}
