//! Orphan pool: received blocks whose parents are not stored yet.

use shared_types::{Block, Hash, PeerId};
use std::collections::HashMap;

/// A block parked until its parents arrive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Orphan {
    pub block: Block,
    /// Peer the block came from; its parents are fetched from there.
    pub source: PeerId,
    pub depth: usize,
}

/// Orphans keyed by hash, indexed by the parents they wait on.
#[derive(Debug)]
pub struct OrphanPool {
    capacity: usize,
    orphans: HashMap<Hash, Orphan>,
    waiting_on: HashMap<Hash, Vec<Hash>>,
}

impl OrphanPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            orphans: HashMap::new(),
            waiting_on: HashMap::new(),
        }
    }

    /// Park `orphan` under each of its `missing` parents.
    ///
    /// Returns `false` if the pool is full. Parking a block that is already
    /// parked refreshes its parent index.
    pub fn insert(&mut self, orphan: Orphan, missing: &[Hash]) -> bool {
        let hash = orphan.block.hash;
        if !self.orphans.contains_key(&hash) && self.orphans.len() >= self.capacity {
            return false;
        }

        for parent in missing {
            let children = self.waiting_on.entry(*parent).or_default();
            if !children.contains(&hash) {
                children.push(hash);
            }
        }
        self.orphans.insert(hash, orphan);
        true
    }

    /// Remove and return every orphan waiting on `parent`.
    ///
    /// Each returned block may still miss other parents; the caller retries
    /// the store and parks it again if so.
    pub fn take_ready(&mut self, parent: &Hash) -> Vec<Orphan> {
        self.waiting_on
            .remove(parent)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| self.orphans.remove(&child))
            .collect()
    }

    /// Remove every orphan that waits on `parent`, directly or through
    /// another evicted orphan. Used when `parent` will never be stored.
    pub fn evict_waiting_on(&mut self, parent: &Hash) -> Vec<Hash> {
        let mut evicted = Vec::new();
        let mut pending = vec![*parent];
        while let Some(hash) = pending.pop() {
            for child in self.waiting_on.remove(&hash).unwrap_or_default() {
                if self.orphans.remove(&child).is_some() {
                    evicted.push(child);
                    pending.push(child);
                }
            }
        }
        evicted
    }

    pub fn remove(&mut self, hash: &Hash) -> Option<Orphan> {
        self.orphans.remove(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.orphans.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.orphans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty()
    }
}
