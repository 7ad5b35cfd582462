//! # Deploy Pool
//!
//! ## Data Structures
//!
//! - `by_hash`: lookup by deploy hash
//! - `by_account`: nonce-ordered deploys per account
//! - `included_nonce`: highest nonce per account seen in a stored block

use super::MempoolError;
use serde::Deserialize;
use shared_types::{AccountId, Deploy, Hash};
use std::collections::{BTreeMap, HashMap};

/// Mempool configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MempoolConfig {
    /// Maximum number of pending deploys.
    pub max_pending: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self { max_pending: 10_000 }
    }
}

/// Pending deploys indexed by hash and by account.
#[derive(Debug)]
pub struct DeployPool {
    config: MempoolConfig,
    by_hash: HashMap<Hash, Deploy>,
    by_account: BTreeMap<AccountId, BTreeMap<u64, Hash>>,
    included_nonce: HashMap<AccountId, u64>,
}

impl DeployPool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            by_hash: HashMap::new(),
            by_account: BTreeMap::new(),
            included_nonce: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Admit a deploy.
    ///
    /// # Errors
    /// - `DuplicateDeploy` if the hash is already pending
    /// - `DuplicateNonce` if the account's nonce is taken
    /// - `PoolFull` if at capacity
    pub fn add(&mut self, deploy: Deploy) -> Result<Hash, MempoolError> {
        let hash = deploy.hash();
        if self.by_hash.contains_key(&hash) {
            return Err(MempoolError::DuplicateDeploy(hash));
        }

        let nonce_taken = self
            .by_account
            .get(&deploy.account)
            .is_some_and(|nonces| nonces.contains_key(&deploy.nonce));
        let nonce_spent = self
            .included_nonce
            .get(&deploy.account)
            .is_some_and(|&included| deploy.nonce <= included);
        if nonce_taken || nonce_spent {
            return Err(MempoolError::DuplicateNonce {
                account: deploy.account,
                nonce: deploy.nonce,
            });
        }

        if self.by_hash.len() >= self.config.max_pending {
            return Err(MempoolError::PoolFull {
                capacity: self.config.max_pending,
            });
        }

        self.by_account
            .entry(deploy.account)
            .or_default()
            .insert(deploy.nonce, hash);
        self.by_hash.insert(hash, deploy);
        Ok(hash)
    }

    /// Up to `max` pending deploys, by account then ascending nonce.
    ///
    /// Deploys stay in the pool until [`Self::remove_included`].
    pub fn select(&self, max: usize) -> Vec<Deploy> {
        self.by_account
            .values()
            .flat_map(|nonces| nonces.values())
            .filter_map(|hash| self.by_hash.get(hash))
            .take(max)
            .cloned()
            .collect()
    }

    /// Drop deploys included in a stored block and advance each account's
    /// included-nonce watermark. Every pending deploy of that account at or
    /// below the watermark goes too, whether or not its hash matches.
    /// Returns how many pending deploys were removed.
    pub fn remove_included(&mut self, deploys: &[Deploy]) -> usize {
        let mut removed = 0;
        for deploy in deploys {
            let watermark = self.included_nonce.entry(deploy.account).or_insert(0);
            *watermark = (*watermark).max(deploy.nonce);
            let watermark = *watermark;

            let Some(nonces) = self.by_account.get_mut(&deploy.account) else {
                continue;
            };
            let keep = match watermark.checked_add(1) {
                Some(first_unspent) => nonces.split_off(&first_unspent),
                None => BTreeMap::new(),
            };
            let spent = std::mem::replace(nonces, keep);
            if nonces.is_empty() {
                self.by_account.remove(&deploy.account);
            }
            for hash in spent.values() {
                if self.by_hash.remove(hash).is_some() {
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Next unused nonce for `account`.
    pub fn next_nonce(&self, account: &AccountId) -> u64 {
        let pending = self
            .by_account
            .get(account)
            .and_then(|nonces| nonces.keys().next_back().copied());
        let included = self.included_nonce.get(account).copied();

        match pending.max(included) {
            Some(highest) => highest + 1,
            None => 1,
        }
    }
}
