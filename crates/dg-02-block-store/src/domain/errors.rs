//! # Domain Errors
//!
//! Error types for the block store. Every variant is a rejected operation,
//! never a panic.

use shared_types::{short_hex, Hash};
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// One or more parents are not stored yet.
    #[error("Block {} is missing {} parent(s)", short_hex(.hash), .missing.len())]
    MissingParent { hash: Hash, missing: Vec<Hash> },

    /// No block with this hash.
    #[error("Block not found: {}", short_hex(.0))]
    NotFound(Hash),

    /// A non-genesis block without parents.
    #[error("Block {} has no parents", short_hex(.0))]
    MissingJustification(Hash),

    /// The carried hash does not match the block contents.
    #[error("Block hash mismatch: claimed {}, computed {}", short_hex(.claimed), short_hex(.computed))]
    HashMismatch { claimed: Hash, computed: Hash },
}
