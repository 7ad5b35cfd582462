//! Mempool error types.

use shared_types::{short_hex, AccountId, Hash};
use thiserror::Error;

/// Deploy admission rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MempoolError {
    /// The exact deploy is already pending.
    #[error("Deploy {} already pending", short_hex(.0))]
    DuplicateDeploy(Hash),

    /// The account already used this nonce.
    #[error("Nonce {nonce} already used by account {account}")]
    DuplicateNonce { account: AccountId, nonce: u64 },

    /// Pool has reached maximum capacity.
    #[error("Mempool full ({capacity} deploys)")]
    PoolFull { capacity: usize },
}
