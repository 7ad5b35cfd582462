//! Gossip configuration.

use serde::Deserialize;
use std::time::Duration;

/// Block gossip configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GossipConfig {
    /// Per-request response deadline in ms
    pub request_timeout_ms: u64,
    /// Advertisers tried per hash before it goes to the retry queue
    pub max_fetch_attempts: u32,
    /// How many ancestor levels a single fetch may pull
    pub max_ancestry_depth: usize,
    /// Maximum encoded block size in bytes
    pub max_block_size_bytes: usize,
    /// Blocks waiting on parents
    pub max_orphans: usize,
}

impl GossipConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 2_000,
            max_fetch_attempts: 3,
            max_ancestry_depth: 64,
            max_block_size_bytes: 4 * 1024 * 1024, // 4 MB
            max_orphans: 4_096,
        }
    }
}
