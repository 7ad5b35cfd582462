//! Proposer → gossip bridge.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::{EventPublisher, InMemoryEventBus, NodeEvent};
use shared_types::Block;

use dg_04_proposer::BlockAnnouncer;

use crate::container::NodeGossip;

/// Implements the proposer's outbound port on top of the gossip engine.
pub struct GossipAnnouncer {
    gossip: Arc<NodeGossip>,
    bus: Arc<InMemoryEventBus>,
}

impl GossipAnnouncer {
    pub fn new(gossip: Arc<NodeGossip>, bus: Arc<InMemoryEventBus>) -> Self {
        Self { gossip, bus }
    }
}

#[async_trait]
impl BlockAnnouncer for GossipAnnouncer {
    async fn announce_block(&self, block: &Block) {
        self.bus
            .publish(NodeEvent::BlockProposed {
                hash: block.hash,
                deploy_count: block.deploys.len(),
            })
            .await;
        self.gossip.announce_local(block).await;
    }
}
