//! # Gossip Engine Service
//!
//! Wires the fetch table and orphan pool to the transport, the block store
//! and the peer table.
//!
//! ## Thread Safety
//!
//! The engine is shared across tasks via `Arc`. Every fetch runs as its
//! own task, so the inbound message loop never waits on a remote peer.
//! Locks are never held across an `.await`.

use crate::domain::{
    FetchTable, GossipConfig, GossipCounters, GossipStats, NextAttempt, Orphan, OrphanPool,
};
use crate::events::GossipError;
use dg_01_peer_table::PeerTable;
use dg_02_block_store::{BlockStore, PutOutcome, StoreError};
use parking_lot::Mutex;
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{
    encoded_block_size, short_hex, Block, GossipMessage, Hash, PeerId, Transport, TransportEvent,
};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, trace, warn};

type FetchTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// An outstanding `Request` waiting for its `Response`.
struct PendingRequest {
    peer: PeerId,
    hash: Hash,
    reply: oneshot::Sender<Option<Block>>,
}

/// Push-pull block gossip.
///
/// ## Dependencies
///
/// - `T: Transport` - peer-to-peer message channel
/// - `P: EventPublisher` - publishes `BlockStored`
pub struct GossipEngine<T, P>
where
    T: Transport + ?Sized + 'static,
    P: EventPublisher + ?Sized + 'static,
{
    local_id: PeerId,
    config: GossipConfig,
    store: Arc<BlockStore>,
    peers: Arc<PeerTable>,
    transport: Arc<T>,
    bus: Arc<P>,
    fetches: Mutex<FetchTable>,
    orphans: Mutex<OrphanPool>,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    next_request_id: AtomicU64,
    counters: GossipCounters,
}

impl<T, P> GossipEngine<T, P>
where
    T: Transport + ?Sized + 'static,
    P: EventPublisher + ?Sized + 'static,
{
    pub fn new(
        config: GossipConfig,
        store: Arc<BlockStore>,
        peers: Arc<PeerTable>,
        transport: Arc<T>,
        bus: Arc<P>,
    ) -> Self {
        Self {
            local_id: transport.local_id(),
            orphans: Mutex::new(OrphanPool::new(config.max_orphans)),
            config,
            store,
            peers,
            transport,
            bus,
            fetches: Mutex::new(FetchTable::new()),
            pending: Mutex::new(HashMap::new()),
            next_request_id: AtomicU64::new(1),
            counters: GossipCounters::default(),
        }
    }

    // =========================================================================
    // OUTBOUND
    // =========================================================================

    /// Advertise `hash` to connected peers.
    ///
    /// Skips `received_from` and every peer already known to hold the hash.
    /// Returns how many peers were reached.
    pub async fn announce(&self, hash: Hash, received_from: Option<PeerId>) -> usize {
        let holders: HashSet<PeerId> = self.store.holders(&hash).into_iter().collect();
        let targets: Vec<PeerId> = self
            .peers
            .connected_peers()
            .into_iter()
            .filter(|p| Some(*p) != received_from && !holders.contains(p))
            .collect();

        let mut reached = 0;
        for peer in targets {
            if self.advertise(&peer, hash).await {
                reached += 1;
            }
        }
        debug!(
            "[dg-05] Advertised {} to {} peer(s)",
            short_hex(&hash),
            reached
        );
        reached
    }

    /// Entry point for blocks produced by this node.
    pub async fn announce_local(&self, block: &Block) -> usize {
        self.bus
            .publish(NodeEvent::BlockStored {
                hash: block.hash,
                source: None,
            })
            .await;
        self.announce(block.hash, None).await
    }

    /// Advertise every stored hash `peer` is not known to hold, parents
    /// first. Called when a peer (re)connects.
    pub async fn catch_up(&self, peer: PeerId) -> usize {
        let mut sent = 0;
        for hash in self.store.hashes_in_insertion_order() {
            if self.store.is_holder(&hash, &peer) {
                continue;
            }
            if !self.advertise(&peer, hash).await {
                // Peer went away mid catch-up; its next connect starts over.
                break;
            }
            sent += 1;
        }
        if sent > 0 {
            info!("[dg-05] Catch-up sent {} advertisement(s) to {}", sent, peer);
        }
        sent
    }

    /// Restart fetches parked in the retry queue.
    pub fn retry_queued(self: &Arc<Self>) -> usize {
        let revived = self.fetches.lock().requeue_all();
        let count = revived.len();
        for hash in revived {
            self.spawn_fetch(hash);
        }
        if count > 0 {
            debug!("[dg-05] Retrying {} queued fetch(es)", count);
        }
        count
    }

    pub fn stats(&self) -> GossipStats {
        let mut stats = self.counters.snapshot();
        {
            let fetches = self.fetches.lock();
            stats.in_flight = fetches.in_flight_len();
            stats.retry_queued = fetches.retry_len();
        }
        stats.orphans = self.orphans.lock().len();
        stats
    }

    async fn advertise(&self, peer: &PeerId, hash: Hash) -> bool {
        let message = GossipMessage::Advertise {
            hash,
            sender: self.local_id,
        };
        match self.transport.send(peer, message).await {
            Ok(()) => {
                GossipCounters::bump(&self.counters.advertisements_sent);
                true
            }
            Err(e) => {
                debug!("[dg-05] Advertise to {} failed: {}", peer, e);
                false
            }
        }
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Dispatch one transport event. Connection events belong to the
    /// connectivity monitor and are ignored here.
    pub async fn handle_event(self: &Arc<Self>, event: TransportEvent) {
        let TransportEvent::Message { from, message } = event else {
            return;
        };
        trace!("[dg-05] {} from {}", message.kind(), from);

        match message {
            GossipMessage::Advertise { hash, .. } => self.on_advertise(from, hash),
            GossipMessage::Request { request_id, hash } => {
                self.on_request(from, request_id, hash).await
            }
            GossipMessage::Response {
                request_id,
                hash,
                block,
            } => self.on_response(from, request_id, hash, block),
        }
    }

    fn on_advertise(self: &Arc<Self>, from: PeerId, hash: Hash) {
        GossipCounters::bump(&self.counters.advertisements_received);
        self.store.mark_holder(hash, from);

        let known = self.store.contains(&hash);
        let parked = self.orphans.lock().contains(&hash);
        if known || parked {
            return;
        }
        self.start_fetch(hash, from, 0);
    }

    async fn on_request(&self, from: PeerId, request_id: u64, hash: Hash) {
        let block = self.store.get(&hash).ok();
        if block.is_some() {
            GossipCounters::bump(&self.counters.requests_served);
        } else {
            GossipCounters::bump(&self.counters.not_found_served);
        }

        let response = GossipMessage::Response {
            request_id,
            hash,
            block,
        };
        if let Err(e) = self.transport.send(&from, response).await {
            debug!("[dg-05] Response to {} failed: {}", from, e);
        }
    }

    fn on_response(&self, from: PeerId, request_id: u64, hash: Hash, block: Option<Block>) {
        let pending = self.pending.lock().remove(&request_id);
        let Some(pending) = pending else {
            debug!(
                "[dg-05] Late response {} for {} from {}",
                request_id,
                short_hex(&hash),
                from
            );
            return;
        };

        if pending.peer != from || pending.hash != hash {
            warn!(
                "[dg-05] Response {} from {} does not match its request",
                request_id, from
            );
            let _ = pending.reply.send(None);
            return;
        }
        // The fetch task may have timed out already.
        let _ = pending.reply.send(block);
    }

    // =========================================================================
    // FETCHING
    // =========================================================================

    fn start_fetch(self: &Arc<Self>, hash: Hash, advertiser: PeerId, depth: usize) {
        let started = self.fetches.lock().begin(hash, advertiser, depth);
        if started {
            self.spawn_fetch(hash);
        }
    }

    fn spawn_fetch(self: &Arc<Self>, hash: Hash) {
        tokio::spawn(Arc::clone(self).fetch_task(hash));
    }

    fn fetch_task(self: Arc<Self>, hash: Hash) -> FetchTask {
        Box::pin(async move { self.run_fetch(hash).await })
    }

    /// Try advertisers in turn until the block is stored or parked.
    async fn run_fetch(self: Arc<Self>, hash: Hash) {
        loop {
            if self.store.contains(&hash) {
                self.fetches.lock().complete(&hash);
                return;
            }

            let next = self
                .fetches
                .lock()
                .next_attempt(&hash, self.config.max_fetch_attempts);
            let (peer, depth) = match next {
                NextAttempt::Peer { peer, depth } => (peer, depth),
                NextAttempt::Exhausted => {
                    debug!(
                        "[dg-05] Fetch of {} exhausted, queued for retry",
                        short_hex(&hash)
                    );
                    return;
                }
                NextAttempt::Idle => return,
            };

            if !self.peers.is_connected(&peer) {
                debug!("[dg-05] Skipping disconnected advertiser {}", peer);
                continue;
            }

            let block = match self.request_block(peer, hash).await {
                Ok(block) => block,
                Err(e) => {
                    debug!("[dg-05] Fetch of {} from {}: {}", short_hex(&hash), peer, e);
                    continue;
                }
            };

            match self.accept_block(hash, block, peer, depth).await {
                Ok(()) => {
                    self.fetches.lock().complete(&hash);
                    return;
                }
                Err(e) => {
                    GossipCounters::bump(&self.counters.dropped_blocks);
                    self.store.forget_holder(&hash, &peer);
                    warn!("[dg-05] Dropped block from {}: {}", peer, e);
                }
            }
        }
    }

    /// Send a `Request` and wait for the matching `Response`, bounded by
    /// `request_timeout`. Never touches the peer table.
    async fn request_block(&self, peer: PeerId, hash: Hash) -> Result<Block, GossipError> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        self.pending
            .lock()
            .insert(request_id, PendingRequest { peer, hash, reply });

        GossipCounters::bump(&self.counters.requests_sent);
        let request = GossipMessage::Request { request_id, hash };
        if let Err(e) = self.transport.send(&peer, request).await {
            self.pending.lock().remove(&request_id);
            return Err(e.into());
        }

        match tokio::time::timeout(self.config.request_timeout(), response).await {
            Ok(Ok(Some(block))) => Ok(block),
            Ok(Ok(None)) => Err(GossipError::NotFound(hash)),
            Ok(Err(_)) | Err(_) => {
                self.pending.lock().remove(&request_id);
                GossipCounters::bump(&self.counters.timeouts);
                Err(GossipError::Timeout { hash, peer })
            }
        }
    }

    /// Validate and store a fetched block, then re-drive its orphans.
    ///
    /// Only validation failures are returned; store outcomes for the block
    /// and its descendants are handled here.
    async fn accept_block(
        self: &Arc<Self>,
        requested: Hash,
        block: Block,
        source: PeerId,
        depth: usize,
    ) -> Result<(), GossipError> {
        let size = encoded_block_size(&block);
        if size > self.config.max_block_size_bytes {
            return Err(GossipError::BlockTooLarge {
                size,
                max: self.config.max_block_size_bytes,
            });
        }
        if block.hash != requested || !block.verify_hash() {
            return Err(GossipError::InvalidBlock(requested));
        }

        let mut ready = vec![Orphan {
            block,
            source,
            depth,
        }];
        while let Some(Orphan {
            block,
            source,
            depth,
        }) = ready.pop()
        {
            let hash = block.hash;
            match self.store.put(block.clone()) {
                Ok(PutOutcome::Added) => {
                    self.store.mark_holder(hash, source);
                    GossipCounters::bump(&self.counters.blocks_stored);
                    info!(
                        "[dg-05] Stored block {} from {}",
                        short_hex(&hash),
                        source
                    );
                    self.bus
                        .publish(NodeEvent::BlockStored {
                            hash,
                            source: Some(source),
                        })
                        .await;
                    self.announce(hash, Some(source)).await;

                    let children = self.orphans.lock().take_ready(&hash);
                    ready.extend(children);
                }
                Ok(PutOutcome::AlreadyKnown) => {
                    self.store.mark_holder(hash, source);
                    GossipCounters::bump(&self.counters.duplicate_blocks);
                }
                Err(StoreError::MissingParent { missing, .. }) => {
                    if let Some(orphan) = self.park_orphan(block, source, depth, &missing) {
                        // A parent landed between the failed put and parking.
                        ready.push(orphan);
                    }
                }
                Err(e) => {
                    GossipCounters::bump(&self.counters.dropped_blocks);
                    warn!("[dg-05] Dropped block {}: {}", short_hex(&hash), e);
                    self.discard(hash);
                }
            }
        }
        Ok(())
    }

    /// Park a block and fetch its missing parents from its source.
    ///
    /// Returns the block back if its parents are all present by now.
    fn park_orphan(
        self: &Arc<Self>,
        block: Block,
        source: PeerId,
        depth: usize,
        missing: &[Hash],
    ) -> Option<Orphan> {
        let hash = block.hash;
        if depth >= self.config.max_ancestry_depth {
            GossipCounters::bump(&self.counters.dropped_blocks);
            warn!(
                "[dg-05] {}",
                GossipError::AncestryTooDeep {
                    hash,
                    depth: self.config.max_ancestry_depth
                }
            );
            self.discard(hash);
            return None;
        }

        let orphan = Orphan {
            block,
            source,
            depth,
        };
        let parked = self.orphans.lock().insert(orphan, missing);
        if !parked {
            GossipCounters::bump(&self.counters.dropped_blocks);
            warn!("[dg-05] Orphan pool full, dropping {}", short_hex(&hash));
            self.discard(hash);
            return None;
        }
        debug!(
            "[dg-05] Parked {} waiting on {} parent(s)",
            short_hex(&hash),
            missing.len()
        );

        for parent in missing {
            self.start_fetch(*parent, source, depth + 1);
        }

        // A parent stored concurrently may have run take_ready before the
        // block was parked.
        if self.store.has_all(missing).len() == missing.len() {
            return self.orphans.lock().remove(&hash);
        }
        None
    }

    /// Forget a block that will not be stored: its holder record and every
    /// orphan that was waiting on it.
    fn discard(&self, hash: Hash) {
        let evicted = self.orphans.lock().evict_waiting_on(&hash);
        self.store.forget_holders(&hash);
        for child in &evicted {
            GossipCounters::bump(&self.counters.dropped_blocks);
            self.store.forget_holders(child);
        }
        if !evicted.is_empty() {
            warn!(
                "[dg-05] Evicted {} orphan(s) waiting on {}",
                evicted.len(),
                short_hex(&hash)
            );
        }
    }
}
