//! # Node Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, PeerId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeEvent {
    // =========================================================================
    // BLOCKS
    // =========================================================================
    /// A block was accepted into the local BlockStore.
    ///
    /// `source` is the peer it was fetched from, `None` for local proposals.
    BlockStored { hash: Hash, source: Option<PeerId> },

    /// The local proposer created a block.
    BlockProposed { hash: Hash, deploy_count: usize },

    // =========================================================================
    // DEPLOYS
    // =========================================================================
    /// A deploy passed admission into the mempool.
    DeployAccepted { hash: Hash },

    // =========================================================================
    // PEERS
    // =========================================================================
    /// A peer transitioned to `connected`.
    PeerConnected { peer: PeerId },

    /// A peer transitioned to `disconnected`.
    PeerDisconnected { peer: PeerId },

    /// The connectivity monitor finished a reconciliation pass.
    PeersRefreshed { connected: usize },
}

impl NodeEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockStored { .. } | Self::BlockProposed { .. } => EventTopic::Blocks,
            Self::DeployAccepted { .. } => EventTopic::Deploys,
            Self::PeerConnected { .. }
            | Self::PeerDisconnected { .. }
            | Self::PeersRefreshed { .. } => EventTopic::Peers,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Block storage and proposal events.
    Blocks,
    /// Mempool admission events.
    Deploys,
    /// Peer connectivity events.
    Peers,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &NodeEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> NodeEvent {
        NodeEvent::BlockStored {
            hash: [1; 32],
            source: None,
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(stored().topic(), EventTopic::Blocks);
        assert_eq!(
            NodeEvent::PeerConnected {
                peer: PeerId::default()
            }
            .topic(),
            EventTopic::Peers
        );
        assert_eq!(
            NodeEvent::DeployAccepted { hash: [2; 32] }.topic(),
            EventTopic::Deploys
        );
        assert_eq!(
            NodeEvent::PeersRefreshed { connected: 0 }.topic(),
            EventTopic::Peers
        );
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&stored()));
        assert!(EventFilter::topics(vec![EventTopic::All]).matches(&stored()));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Peers]);

        assert!(!filter.matches(&stored()));
        assert!(filter.matches(&NodeEvent::PeerDisconnected {
            peer: PeerId::default()
        }));
    }
}
