//! # Deploy Mempool (dg-03)
//!
//! Holds deploys waiting to be included in a block.
//!
//! ## Admission
//!
//! - Same deploy hash already pending: `DuplicateDeploy`.
//! - Same account and nonce already pending, or a nonce at or below the
//!   highest nonce of that account already included in a stored block:
//!   `DuplicateNonce`.
//! - Pool at capacity: `PoolFull`.
//!
//! A deploy leaves the pool once a block containing it is stored.

pub mod domain;
pub mod service;

pub use domain::{DeployPool, MempoolConfig, MempoolError};
pub use service::DeployMempool;
