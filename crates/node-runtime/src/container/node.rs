//! # Node
//!
//! One node identity with all of its components.
//!
//! ## Startup Sequence
//!
//! 1. Create shared infrastructure (event bus, peer table, block store with
//!    the chain's genesis block)
//! 2. Create the mempool, gossip engine, connectivity monitor and proposer
//! 3. Subscribe the choreography handler (before anything can publish)
//! 4. Spawn the inbound handler, choreography handler, monitor loop and
//!    proposer task

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use shared_bus::{EventFilter, EventPublisher, EventTopic, InMemoryEventBus, NodeEvent};
use shared_types::{
    AccountId, Block, Deploy, DiscoverySource, Hash, NodeId, Transport, TransportEvents,
};

use dg_01_peer_table::{PeerRecord, PeerTable};
use dg_02_block_store::{BlockStore, StoreStats};
use dg_03_deploy_pool::{DeployMempool, MempoolError};
use dg_04_proposer::{Proposer, ProposerError, ProposerHandle};
use dg_05_gossip::{GossipEngine, GossipStats};
use dg_06_connectivity::ConnectivityMonitor;

use crate::adapters::GossipAnnouncer;
use crate::container::NodeConfig;
use crate::handlers::{ChoreographyHandler, InboundHandler};

/// Gossip engine as wired by the runtime.
pub type NodeGossip = GossipEngine<dyn Transport, InMemoryEventBus>;

/// Connectivity monitor as wired by the runtime.
pub type NodeMonitor = ConnectivityMonitor<dyn Transport, dyn DiscoverySource, InMemoryEventBus>;

/// Errors surfaced by the node's client-facing operations.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Mempool(#[from] MempoolError),

    #[error(transparent)]
    Proposer(#[from] ProposerError),
}

/// A running node.
pub struct Node {
    id: NodeId,
    store: Arc<BlockStore>,
    peers: Arc<PeerTable>,
    mempool: Arc<DeployMempool>,
    bus: Arc<InMemoryEventBus>,
    gossip: Arc<NodeGossip>,
    monitor: Arc<NodeMonitor>,
    proposer: ProposerHandle,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Node {
    /// Build and start a node on `transport`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: &NodeConfig,
        transport: Arc<dyn Transport>,
        events: TransportEvents,
        discovery: Arc<dyn DiscoverySource>,
    ) -> Arc<Self> {
        let id = transport.local_id();
        let genesis = Block::genesis(&config.network.chain_name);

        let bus = Arc::new(InMemoryEventBus::new());
        let peers = Arc::new(PeerTable::new(id));
        let store = Arc::new(BlockStore::new(genesis));
        let mempool = Arc::new(DeployMempool::new(config.mempool.clone()));

        let gossip: Arc<NodeGossip> = Arc::new(GossipEngine::new(
            config.gossip.clone(),
            Arc::clone(&store),
            Arc::clone(&peers),
            Arc::clone(&transport),
            Arc::clone(&bus),
        ));
        let monitor: Arc<NodeMonitor> = Arc::new(ConnectivityMonitor::new(
            config.connectivity.clone(),
            Arc::clone(&peers),
            transport,
            discovery,
            Arc::clone(&bus),
        ));
        let announcer = Arc::new(GossipAnnouncer::new(Arc::clone(&gossip), Arc::clone(&bus)));
        let (proposer, proposer_handle) = Proposer::new(
            config.proposer.clone(),
            id,
            Arc::clone(&store),
            Arc::clone(&mempool),
            announcer,
        );

        let choreography = ChoreographyHandler::new(
            bus.event_stream(EventFilter::topics(vec![EventTopic::Blocks, EventTopic::Peers])),
            Arc::clone(&gossip),
            Arc::clone(&store),
            Arc::clone(&mempool),
        );
        let inbound = InboundHandler::new(events, Arc::clone(&gossip), Arc::clone(&monitor));

        let (shutdown, shutdown_rx) = watch::channel(false);
        let tasks = vec![
            tokio::spawn(inbound.run(shutdown_rx.clone())),
            tokio::spawn(choreography.run(shutdown_rx.clone())),
            tokio::spawn({
                let monitor = Arc::clone(&monitor);
                let shutdown_rx = shutdown_rx.clone();
                async move { monitor.run(shutdown_rx).await }
            }),
            tokio::spawn(proposer.run(shutdown_rx)),
        ];

        info!("[runtime] Node {} started", id);
        Arc::new(Self {
            id,
            store,
            peers,
            mempool,
            bus,
            gossip,
            monitor,
            proposer: proposer_handle,
            shutdown,
            tasks: Mutex::new(tasks),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    // =========================================================================
    // CLIENT OPERATIONS
    // =========================================================================

    /// Admit a deploy to the local mempool.
    pub async fn submit_deploy(&self, deploy: Deploy) -> Result<Hash, NodeError> {
        let hash = self.mempool.submit(deploy)?;
        self.bus.publish(NodeEvent::DeployAccepted { hash }).await;
        Ok(hash)
    }

    /// Build, store and announce a block from pending deploys.
    pub async fn propose(&self) -> Result<Block, NodeError> {
        Ok(self.proposer.propose().await?)
    }

    /// Submit one deploy for `account` with the next free nonce, propose a
    /// block and return its hash.
    pub async fn deploy_and_propose(
        &self,
        account: AccountId,
        payload: Vec<u8>,
    ) -> Result<Hash, NodeError> {
        let nonce = self.mempool.next_nonce(&account);
        self.submit_deploy(Deploy::new(account, payload, nonce, now_millis()))
            .await?;
        Ok(self.propose().await?.hash)
    }

    // =========================================================================
    // OBSERVABILITY
    // =========================================================================

    pub fn block_count(&self) -> usize {
        self.store.len()
    }

    pub fn connected_peer_count(&self) -> usize {
        self.peers.connected_count()
    }

    pub fn has_block(&self, hash: &Hash) -> bool {
        self.store.contains(hash)
    }

    pub fn has_blocks(&self, hashes: &[Hash]) -> bool {
        self.store.has_all(hashes).len() == hashes.len()
    }

    /// Stored hashes, parents before children.
    pub fn block_hashes(&self) -> Vec<Hash> {
        self.store.hashes_in_insertion_order()
    }

    pub fn tips(&self) -> Vec<Hash> {
        self.store.tips()
    }

    pub fn pending_deploys(&self) -> usize {
        self.mempool.len()
    }

    pub fn peers(&self) -> Vec<PeerRecord> {
        self.peers.snapshot()
    }

    pub fn gossip_stats(&self) -> GossipStats {
        self.gossip.stats()
    }

    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn event_bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Run one reconciliation pass now instead of waiting for the next tick.
    pub async fn reconcile(&self) {
        self.monitor.tick().await;
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Stop every task started by [`Node::start`] and wait for them.
    pub async fn shutdown(&self) {
        self.shutdown.send_replace(true);
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                warn!("[runtime] Node {} task ended abnormally: {}", self.id, e);
            }
        }
        info!("[runtime] Node {} stopped", self.id);
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
