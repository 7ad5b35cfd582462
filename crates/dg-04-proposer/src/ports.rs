//! Outbound ports (driven side - SPI)

use async_trait::async_trait;
use shared_types::Block;

/// Port: hand a freshly stored local block to gossip.
#[async_trait]
pub trait BlockAnnouncer: Send + Sync {
    async fn announce_block(&self, block: &Block);
}
