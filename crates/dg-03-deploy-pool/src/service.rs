//! # Deploy Mempool Service
//!
//! Thread-safe wrapper around [`DeployPool`]. Clients submit concurrently;
//! the proposer and the block-stored handler drain it.

use crate::domain::{DeployPool, MempoolConfig, MempoolError};
use parking_lot::Mutex;
use shared_types::{short_hex, AccountId, Deploy, Hash};
use tracing::{debug, info};

pub struct DeployMempool {
    pool: Mutex<DeployPool>,
}

impl DeployMempool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            pool: Mutex::new(DeployPool::new(config)),
        }
    }

    /// Admit a deploy and return its hash.
    pub fn submit(&self, deploy: Deploy) -> Result<Hash, MempoolError> {
        let account = deploy.account;
        let nonce = deploy.nonce;
        match self.pool.lock().add(deploy) {
            Ok(hash) => {
                info!(
                    "[dg-03] Accepted deploy {} (account {}, nonce {})",
                    short_hex(&hash),
                    account,
                    nonce
                );
                Ok(hash)
            }
            Err(e) => {
                debug!("[dg-03] Rejected deploy: {}", e);
                Err(e)
            }
        }
    }

    pub fn select_for_block(&self, max: usize) -> Vec<Deploy> {
        self.pool.lock().select(max)
    }

    pub fn remove_included(&self, deploys: &[Deploy]) -> usize {
        let removed = self.pool.lock().remove_included(deploys);
        if removed > 0 {
            debug!("[dg-03] Removed {} included deploy(s)", removed);
        }
        removed
    }

    /// Next unused nonce for `account`.
    ///
    /// Another caller may take the same nonce before this one submits; the
    /// loser gets `DuplicateNonce`.
    pub fn next_nonce(&self, account: &AccountId) -> u64 {
        self.pool.lock().next_nonce(account)
    }

    pub fn len(&self) -> usize {
        self.pool.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.lock().is_empty()
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.pool.lock().contains(hash)
    }
}

impl Default for DeployMempool {
    fn default() -> Self {
        Self::new(MempoolConfig::default())
    }
}
