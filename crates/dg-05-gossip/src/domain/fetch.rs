//! In-flight fetch table and retry queue.

use shared_types::{Hash, PeerId};
use std::collections::{BTreeMap, HashMap};

/// A hash being fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlightFetch {
    /// Peers that advertised the hash, in the order they will be tried.
    pub advertisers: Vec<PeerId>,
    /// Index of the next advertiser to try.
    pub next: usize,
    /// Requests sent so far.
    pub attempts: u32,
    /// Ancestor level (0 for advertised hashes).
    pub depth: usize,
}

impl InFlightFetch {
    fn new(advertisers: Vec<PeerId>, depth: usize) -> Self {
        Self {
            advertisers,
            next: 0,
            attempts: 0,
            depth,
        }
    }

    fn add_advertiser(&mut self, peer: PeerId) {
        if !self.advertisers.contains(&peer) {
            self.advertisers.push(peer);
        }
    }
}

/// A hash parked until the next peer-table refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryEntry {
    pub advertisers: Vec<PeerId>,
    pub depth: usize,
}

/// What a fetch task should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextAttempt {
    /// Request from this peer.
    Peer { peer: PeerId, depth: usize },
    /// Attempts used up; the hash moved to the retry queue.
    Exhausted,
    /// The hash is no longer being fetched.
    Idle,
}

/// Per-hash fetch state.
///
/// A hash is in at most one of `in_flight` and `retry`.
#[derive(Debug, Default)]
pub struct FetchTable {
    in_flight: HashMap<Hash, InFlightFetch>,
    retry: BTreeMap<Hash, RetryEntry>,
}

impl FetchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an advertiser for `hash`.
    ///
    /// Returns `true` if a new fetch started and the caller must drive it.
    /// If the hash is already in flight the peer only becomes a fallback
    /// source. A queued hash is revived with the fresh advertiser first.
    pub fn begin(&mut self, hash: Hash, advertiser: PeerId, depth: usize) -> bool {
        if let Some(fetch) = self.in_flight.get_mut(&hash) {
            fetch.add_advertiser(advertiser);
            fetch.depth = fetch.depth.min(depth);
            return false;
        }

        let fetch = match self.retry.remove(&hash) {
            Some(entry) => {
                let mut advertisers = vec![advertiser];
                advertisers.extend(entry.advertisers.into_iter().filter(|p| *p != advertiser));
                InFlightFetch::new(advertisers, entry.depth.min(depth))
            }
            None => InFlightFetch::new(vec![advertiser], depth),
        };
        self.in_flight.insert(hash, fetch);
        true
    }

    /// Pick the next advertiser to ask.
    pub fn next_attempt(&mut self, hash: &Hash, max_attempts: u32) -> NextAttempt {
        let Some(fetch) = self.in_flight.get_mut(hash) else {
            return NextAttempt::Idle;
        };

        if fetch.attempts >= max_attempts || fetch.next >= fetch.advertisers.len() {
            if let Some(fetch) = self.in_flight.remove(hash) {
                self.retry.insert(
                    *hash,
                    RetryEntry {
                        advertisers: fetch.advertisers,
                        depth: fetch.depth,
                    },
                );
            }
            return NextAttempt::Exhausted;
        }

        let peer = fetch.advertisers[fetch.next];
        fetch.next += 1;
        fetch.attempts += 1;
        NextAttempt::Peer {
            peer,
            depth: fetch.depth,
        }
    }

    /// Forget `hash`: it was stored or parked as an orphan.
    pub fn complete(&mut self, hash: &Hash) {
        self.in_flight.remove(hash);
        self.retry.remove(hash);
    }

    /// Move every queued hash back in flight with fresh attempt budgets.
    pub fn requeue_all(&mut self) -> Vec<Hash> {
        let queued = std::mem::take(&mut self.retry);
        let mut revived = Vec::with_capacity(queued.len());
        for (hash, entry) in queued {
            self.in_flight
                .insert(hash, InFlightFetch::new(entry.advertisers, entry.depth));
            revived.push(hash);
        }
        revived
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn retry_len(&self) -> usize {
        self.retry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: Hash = [1; 32];

    fn peer(n: u64) -> PeerId {
        PeerId::from_seed(n)
    }

    #[test]
    fn test_second_advertiser_joins_existing_fetch() {
        let mut table = FetchTable::new();
        assert!(table.begin(HASH, peer(1), 0));
        assert!(!table.begin(HASH, peer(2), 0));
        assert!(!table.begin(HASH, peer(2), 0));

        assert_eq!(
            table.next_attempt(&HASH, 5),
            NextAttempt::Peer {
                peer: peer(1),
                depth: 0
            }
        );
        assert_eq!(
            table.next_attempt(&HASH, 5),
            NextAttempt::Peer {
                peer: peer(2),
                depth: 0
            }
        );
        assert_eq!(table.next_attempt(&HASH, 5), NextAttempt::Exhausted);
        assert_eq!(table.retry_len(), 1);
        assert_eq!(table.in_flight_len(), 0);
    }

    #[test]
    fn test_attempt_budget_is_bounded() {
        let mut table = FetchTable::new();
        table.begin(HASH, peer(1), 0);
        for n in 2..6 {
            table.begin(HASH, peer(n), 0);
        }

        let mut tried = 0;
        while let NextAttempt::Peer { .. } = table.next_attempt(&HASH, 3) {
            tried += 1;
        }
        assert_eq!(tried, 3);
        assert_eq!(table.retry_len(), 1);
    }

    #[test]
    fn test_requeue_restores_fetch() {
        let mut table = FetchTable::new();
        table.begin(HASH, peer(1), 2);
        table.next_attempt(&HASH, 1);
        assert_eq!(table.next_attempt(&HASH, 1), NextAttempt::Exhausted);

        assert_eq!(table.requeue_all(), vec![HASH]);
        assert_eq!(table.retry_len(), 0);
        assert_eq!(
            table.next_attempt(&HASH, 1),
            NextAttempt::Peer {
                peer: peer(1),
                depth: 2
            }
        );
    }

    #[test]
    fn test_fresh_advertisement_revives_queued_hash() {
        let mut table = FetchTable::new();
        table.begin(HASH, peer(1), 0);
        table.next_attempt(&HASH, 1);
        table.next_attempt(&HASH, 1);
        assert_eq!(table.retry_len(), 1);

        assert!(table.begin(HASH, peer(2), 0));
        assert_eq!(
            table.next_attempt(&HASH, 3),
            NextAttempt::Peer {
                peer: peer(2),
                depth: 0
            }
        );
    }

    #[test]
    fn test_complete_forgets_everything() {
        let mut table = FetchTable::new();
        table.begin(HASH, peer(1), 0);
        table.complete(&HASH);

        assert_eq!(table.next_attempt(&HASH, 3), NextAttempt::Idle);
        assert_eq!(table.in_flight_len(), 0);
    }
}
