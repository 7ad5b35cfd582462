//! # Shared Bus - Event Bus for Inter-Component Communication
//!
//! Components of one node never call each other to report facts; they
//! publish a [`NodeEvent`] and whoever cares subscribes.
//!
//! ```text
//! ┌──────────────────────┐                  ┌──────────────────────┐
//! │ ConnectivityMonitor  │  PeerConnected   │    GossipEngine      │
//! │                      │ ──────┐          │  (catch-up advert.)  │
//! └──────────────────────┘       │          └──────────────────────┘
//!                                ▼                    ↑
//!                         ┌──────────────┐            │
//!                         │  Event Bus   │ ───────────┘
//!                         │              │ ───────────┐
//!                         └──────────────┘            ↓
//!                                ▲          ┌──────────────────────┐
//! ┌──────────────────────┐       │          │    DeployMempool     │
//! │    GossipEngine      │ ──────┘          │ (remove included)    │
//! └──────────────────────┘   BlockStored    └──────────────────────┘
//! ```
//!
//! Delivery is best effort: a subscriber that falls behind by more than the
//! channel capacity skips the oldest events.

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, NodeEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are skipped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1024);
    }
}
