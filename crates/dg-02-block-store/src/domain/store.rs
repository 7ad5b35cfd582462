//! The block store.

use super::StoreError;
use parking_lot::RwLock;
use shared_types::{short_hex, Block, Hash, PeerId};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Result of a successful [`BlockStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The block was newly stored.
    Added,
    /// The block was already present; nothing changed.
    AlreadyKnown,
}

/// Store counters for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub blocks: usize,
    pub tips: usize,
    pub tracked_holders: usize,
}

#[derive(Default)]
struct DagIndex {
    blocks: HashMap<Hash, Block>,
    /// Insertion order. Parents always precede children.
    order: Vec<Hash>,
    /// Stored blocks with no stored child.
    tips: BTreeSet<Hash>,
}

/// Content-addressed block DAG.
///
/// Two locks: one for the DAG, one for the holder bookkeeping. Readers of
/// the DAG never observe a block whose parents are absent.
pub struct BlockStore {
    genesis: Hash,
    dag: RwLock<DagIndex>,
    holders: RwLock<HashMap<Hash, HashSet<PeerId>>>,
}

impl BlockStore {
    /// Create a store seeded with the genesis block.
    pub fn new(genesis: Block) -> Self {
        let hash = genesis.hash;
        let mut dag = DagIndex::default();
        dag.order.push(hash);
        dag.tips.insert(hash);
        dag.blocks.insert(hash, genesis);

        Self {
            genesis: hash,
            dag: RwLock::new(dag),
            holders: RwLock::new(HashMap::new()),
        }
    }

    pub fn genesis_hash(&self) -> Hash {
        self.genesis
    }

    /// Store a block whose parents are all present.
    pub fn put(&self, block: Block) -> Result<PutOutcome, StoreError> {
        if !block.verify_hash() {
            return Err(StoreError::HashMismatch {
                claimed: block.hash,
                computed: block.header.hash(),
            });
        }

        let mut dag = self.dag.write();
        if dag.blocks.contains_key(&block.hash) {
            return Ok(PutOutcome::AlreadyKnown);
        }
        if block.is_parentless() {
            return Err(StoreError::MissingJustification(block.hash));
        }

        let missing: Vec<Hash> = block
            .parents()
            .iter()
            .filter(|p| !dag.blocks.contains_key(*p))
            .copied()
            .collect();
        if !missing.is_empty() {
            debug!(
                "[dg-02] Block {} waiting on {} parent(s)",
                short_hex(&block.hash),
                missing.len()
            );
            return Err(StoreError::MissingParent {
                hash: block.hash,
                missing,
            });
        }

        let hash = block.hash;
        for parent in block.parents() {
            dag.tips.remove(parent);
        }
        dag.tips.insert(hash);
        dag.order.push(hash);
        dag.blocks.insert(hash, block);

        info!(
            "[dg-02] 📦 Stored block {} (total {})",
            short_hex(&hash),
            dag.blocks.len()
        );
        Ok(PutOutcome::Added)
    }

    pub fn get(&self, hash: &Hash) -> Result<Block, StoreError> {
        self.dag
            .read()
            .blocks
            .get(hash)
            .cloned()
            .ok_or(StoreError::NotFound(*hash))
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.dag.read().blocks.contains_key(hash)
    }

    /// The subset of `hashes` already stored, in input order.
    pub fn has_all(&self, hashes: &[Hash]) -> Vec<Hash> {
        let dag = self.dag.read();
        hashes
            .iter()
            .filter(|h| dag.blocks.contains_key(*h))
            .copied()
            .collect()
    }

    /// Current DAG tips, sorted.
    pub fn tips(&self) -> Vec<Hash> {
        self.dag.read().tips.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.dag.read().blocks.len()
    }

    /// Never true: genesis is always present.
    pub fn is_empty(&self) -> bool {
        self.dag.read().blocks.is_empty()
    }

    /// Every stored hash, parents before children.
    pub fn hashes_in_insertion_order(&self) -> Vec<Hash> {
        self.dag.read().order.clone()
    }

    // =========================================================================
    // HOLDER BOOKKEEPING
    // =========================================================================

    /// Record that `peer` is known to hold `hash`.
    ///
    /// Works for hashes not stored yet (an advertisement may arrive before
    /// the block does). Returns `true` if this is new information.
    pub fn mark_holder(&self, hash: Hash, peer: PeerId) -> bool {
        self.holders.write().entry(hash).or_default().insert(peer)
    }

    /// Forget every holder of a hash that is not stored. A stored hash
    /// keeps its holders. Returns how many peers were forgotten.
    pub fn forget_holders(&self, hash: &Hash) -> usize {
        if self.contains(hash) {
            return 0;
        }
        self.holders
            .write()
            .remove(hash)
            .map_or(0, |peers| peers.len())
    }

    /// `peer` no longer counts as holding `hash`.
    pub fn forget_holder(&self, hash: &Hash, peer: &PeerId) -> bool {
        let mut holders = self.holders.write();
        let Some(peers) = holders.get_mut(hash) else {
            return false;
        };
        let removed = peers.remove(peer);
        if peers.is_empty() {
            holders.remove(hash);
        }
        removed
    }

    /// Peers known to hold `hash`, sorted.
    pub fn holders(&self, hash: &Hash) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .holders
            .read()
            .get(hash)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        peers.sort_unstable();
        peers
    }

    pub fn is_holder(&self, hash: &Hash, peer: &PeerId) -> bool {
        self.holders
            .read()
            .get(hash)
            .is_some_and(|set| set.contains(peer))
    }

    pub fn stats(&self) -> StoreStats {
        let (blocks, tips) = {
            let dag = self.dag.read();
            (dag.blocks.len(), dag.tips.len())
        };
        StoreStats {
            blocks,
            tips,
            tracked_holders: self.holders.read().values().map(HashSet::len).sum(),
        }
    }
}
