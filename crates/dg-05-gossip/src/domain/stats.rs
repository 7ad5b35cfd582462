//! Gossip counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of gossip activity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GossipStats {
    pub advertisements_sent: u64,
    pub advertisements_received: u64,
    pub requests_sent: u64,
    pub requests_served: u64,
    pub not_found_served: u64,
    pub blocks_stored: u64,
    pub duplicate_blocks: u64,
    pub timeouts: u64,
    pub dropped_blocks: u64,
    pub in_flight: usize,
    pub retry_queued: usize,
    pub orphans: usize,
}

#[derive(Default)]
pub(crate) struct GossipCounters {
    pub advertisements_sent: AtomicU64,
    pub advertisements_received: AtomicU64,
    pub requests_sent: AtomicU64,
    pub requests_served: AtomicU64,
    pub not_found_served: AtomicU64,
    pub blocks_stored: AtomicU64,
    pub duplicate_blocks: AtomicU64,
    pub timeouts: AtomicU64,
    pub dropped_blocks: AtomicU64,
}

impl GossipCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GossipStats {
        let get = |c: &AtomicU64| c.load(Ordering::Relaxed);
        GossipStats {
            advertisements_sent: get(&self.advertisements_sent),
            advertisements_received: get(&self.advertisements_received),
            requests_sent: get(&self.requests_sent),
            requests_served: get(&self.requests_served),
            not_found_served: get(&self.not_found_served),
            blocks_stored: get(&self.blocks_stored),
            duplicate_blocks: get(&self.duplicate_blocks),
            timeouts: get(&self.timeouts),
            dropped_blocks: get(&self.dropped_blocks),
            ..GossipStats::default()
        }
    }
}
