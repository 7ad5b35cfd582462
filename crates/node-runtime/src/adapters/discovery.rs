//! Static peer discovery.

use parking_lot::RwLock;
use shared_types::{DiscoverySource, PeerId};

/// A fixed target set, editable at runtime.
#[derive(Debug, Default)]
pub struct StaticDiscovery {
    targets: RwLock<Vec<PeerId>>,
}

impl StaticDiscovery {
    pub fn new(targets: impl IntoIterator<Item = PeerId>) -> Self {
        let mut targets: Vec<PeerId> = targets.into_iter().collect();
        targets.sort();
        targets.dedup();
        Self {
            targets: RwLock::new(targets),
        }
    }

    /// Add a target; returns `false` if it was already present.
    pub fn add(&self, peer: PeerId) -> bool {
        let mut targets = self.targets.write();
        match targets.binary_search(&peer) {
            Ok(_) => false,
            Err(pos) => {
                targets.insert(pos, peer);
                true
            }
        }
    }
}

impl DiscoverySource for StaticDiscovery {
    fn target_peers(&self) -> Vec<PeerId> {
        self.targets.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_deduplicated() {
        let a = PeerId::from_seed(1);
        let b = PeerId::from_seed(2);
        let discovery = StaticDiscovery::new([a, b, a]);
        assert_eq!(discovery.target_peers().len(), 2);

        assert!(!discovery.add(b));
        assert!(discovery.add(PeerId::from_seed(3)));
        assert_eq!(discovery.target_peers().len(), 3);
    }
}
