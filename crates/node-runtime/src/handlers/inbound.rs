//! Transport event routing.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use shared_types::{TransportEvent, TransportEvents};

use crate::container::{NodeGossip, NodeMonitor};

/// Drains the transport's inbound channel.
///
/// Connection signals go to the connectivity monitor; gossip messages go to
/// the gossip engine.
pub struct InboundHandler {
    events: TransportEvents,
    gossip: Arc<NodeGossip>,
    monitor: Arc<NodeMonitor>,
}

impl InboundHandler {
    pub fn new(events: TransportEvents, gossip: Arc<NodeGossip>, monitor: Arc<NodeMonitor>) -> Self {
        Self {
            events,
            gossip,
            monitor,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        debug!("[runtime] Inbound handler started");
        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else {
                        info!("[runtime] Transport closed, inbound handler stopping");
                        break;
                    };
                    self.dispatch(event).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("[runtime] Inbound handler stopped");
    }

    async fn dispatch(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected { peer } => self.monitor.on_inbound_connection(peer).await,
            TransportEvent::Disconnected { peer } => self.monitor.on_disconnect(peer).await,
            message @ TransportEvent::Message { .. } => self.gossip.handle_event(message).await,
        }
    }
}
