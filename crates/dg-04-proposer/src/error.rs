//! Error types for block proposal.

use dg_02_block_store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposerError {
    /// The mempool had nothing to include. Not retried.
    #[error("No pending deploys")]
    NoPendingDeploys,

    /// The block store rejected the new block.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The proposer task is not running.
    #[error("Proposer stopped")]
    Stopped,
}
