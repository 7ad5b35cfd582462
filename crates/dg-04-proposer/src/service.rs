//! # Proposer Service
//!
//! The proposer owns its sequence counter and runs as one task; callers
//! talk to it through a cloneable [`ProposerHandle`].

use crate::config::ProposerConfig;
use crate::error::ProposerError;
use crate::ports::BlockAnnouncer;
use dg_02_block_store::BlockStore;
use dg_03_deploy_pool::DeployMempool;
use shared_types::{short_hex, Block, NodeId};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

type ProposeReply = oneshot::Sender<Result<Block, ProposerError>>;

/// Cloneable front door to the proposer task.
#[derive(Clone)]
pub struct ProposerHandle {
    requests: mpsc::Sender<ProposeReply>,
}

impl ProposerHandle {
    /// Ask the proposer for a new block.
    ///
    /// Waits until the proposer task is running.
    pub async fn propose(&self) -> Result<Block, ProposerError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(reply)
            .await
            .map_err(|_| ProposerError::Stopped)?;
        response.await.map_err(|_| ProposerError::Stopped)?
    }
}

/// The block proposer.
pub struct Proposer<A: BlockAnnouncer + ?Sized> {
    config: ProposerConfig,
    creator: NodeId,
    store: Arc<BlockStore>,
    mempool: Arc<DeployMempool>,
    announcer: Arc<A>,
    seq_num: u64,
    requests: mpsc::Receiver<ProposeReply>,
}

impl<A: BlockAnnouncer + ?Sized> Proposer<A> {
    pub fn new(
        config: ProposerConfig,
        creator: NodeId,
        store: Arc<BlockStore>,
        mempool: Arc<DeployMempool>,
        announcer: Arc<A>,
    ) -> (Self, ProposerHandle) {
        let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
        let proposer = Self {
            config,
            creator,
            store,
            mempool,
            announcer,
            seq_num: 0,
            requests: rx,
        };
        (proposer, ProposerHandle { requests: tx })
    }

    /// Serve propose requests until shutdown or until every handle is gone.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[dg-04] Proposer started for {}", self.creator);
        loop {
            tokio::select! {
                request = self.requests.recv() => {
                    let Some(reply) = request else { break };
                    let result = self.propose_once().await;
                    // The caller may have given up waiting.
                    let _ = reply.send(result);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[dg-04] Proposer stopped for {}", self.creator);
    }

    /// Build, store and announce one block.
    pub async fn propose_once(&mut self) -> Result<Block, ProposerError> {
        let deploys = self
            .mempool
            .select_for_block(self.config.max_deploys_per_block);
        if deploys.is_empty() {
            debug!("[dg-04] Nothing to propose");
            return Err(ProposerError::NoPendingDeploys);
        }

        let parents = self.store.tips();
        let seq_num = self.seq_num + 1;
        let block = Block::new(parents, self.creator, seq_num, now_ms(), deploys);

        self.store.put(block.clone())?;
        self.seq_num = seq_num;
        self.mempool.remove_included(&block.deploys);

        info!(
            "[dg-04] ⛏ Proposed block {} (seq {}, {} deploys, {} parents)",
            short_hex(&block.hash),
            seq_num,
            block.deploys.len(),
            block.parents().len()
        );
        self.announcer.announce_block(&block).await;
        Ok(block)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
