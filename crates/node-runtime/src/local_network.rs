//! # Local Network
//!
//! N nodes on one [`InMemoryNetwork`] with a fully meshed target set.
//! Topologies other than the full mesh are expressed by cutting links, which
//! also keeps the monitors from ever reaching around them.

use std::sync::Arc;

use shared_types::{DiscoverySource, NodeId, PeerId, Transport};
use tracing::info;

use crate::adapters::{InMemoryNetwork, StaticDiscovery};
use crate::container::{Node, NodeConfig};

/// Identity of the `index`-th node of a local network.
pub fn local_node_id(index: usize) -> NodeId {
    NodeId::from_seed(index as u64 + 1)
}

pub struct LocalNetwork {
    network: Arc<InMemoryNetwork>,
    nodes: Vec<Arc<Node>>,
}

impl LocalNetwork {
    /// Fully connected network of `count` nodes.
    pub fn start(count: usize, config: &NodeConfig) -> Self {
        Self::with_cut_links(count, config, &[])
    }

    /// Nodes `0 - 1 - ... - n-1` where only neighbours can connect.
    pub fn line(count: usize, config: &NodeConfig) -> Self {
        let cut: Vec<(usize, usize)> = (0..count)
            .flat_map(|i| (i + 2..count).map(move |j| (i, j)))
            .collect();
        Self::with_cut_links(count, config, &cut)
    }

    /// Start `count` nodes with the given links cut from the outset.
    pub fn with_cut_links(count: usize, config: &NodeConfig, cut: &[(usize, usize)]) -> Self {
        let network = InMemoryNetwork::new();
        let ids: Vec<PeerId> = (0..count).map(local_node_id).collect();

        let endpoints: Vec<_> = ids.iter().map(|id| network.register(*id)).collect();
        for (a, b) in cut {
            network.disconnect(ids[*a], ids[*b]);
        }

        let nodes = endpoints
            .into_iter()
            .map(|(transport, events)| {
                let local = transport.local_id();
                let discovery: Arc<dyn DiscoverySource> = Arc::new(StaticDiscovery::new(
                    ids.iter().copied().filter(|id| *id != local),
                ));
                let transport: Arc<dyn Transport> = transport;
                Node::start(config, transport, events, discovery)
            })
            .collect();

        info!(
            "[runtime] Local network of {} node(s) started ({} link(s) cut)",
            count,
            cut.len()
        );
        Self { network, nodes }
    }

    pub fn node(&self, index: usize) -> &Arc<Node> {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn network(&self) -> &Arc<InMemoryNetwork> {
        &self.network
    }

    /// Cut the link between nodes `a` and `b`.
    pub fn disconnect(&self, a: usize, b: usize) {
        self.network.disconnect(self.nodes[a].id(), self.nodes[b].id());
    }

    /// Restore the link between nodes `a` and `b`.
    pub fn connect(&self, a: usize, b: usize) {
        self.network.connect(self.nodes[a].id(), self.nodes[b].id());
    }

    /// Cut every link between the two sides.
    pub fn partition(&self, left: &[usize], right: &[usize]) {
        for a in left {
            for b in right {
                self.disconnect(*a, *b);
            }
        }
    }

    /// Restore every link between the two sides.
    pub fn heal(&self, left: &[usize], right: &[usize]) {
        for a in left {
            for b in right {
                self.connect(*a, *b);
            }
        }
    }

    pub async fn shutdown(&self) {
        for node in &self.nodes {
            node.shutdown().await;
            self.network.unregister(&node.id());
        }
    }
}
