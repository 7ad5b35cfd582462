//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `NodeId` / `PeerId`, `AccountId`
//! - **Work**: `Deploy`
//! - **DAG**: `BlockHeader`, `Block`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte SHA-256 content hash.
pub type Hash = [u8; 32];

/// Short hex rendering of a hash for log lines (first 4 bytes).
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}

/// Unique identifier for a node in the network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    /// Create a NodeId from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic identity from a small integer.
    ///
    /// Local networks and tests use this so that node `n` always has the
    /// same id across runs.
    pub fn from_seed(seed: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"dg-node");
        hasher.update(seed.to_le_bytes());
        Self(hasher.finalize().into())
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..4]))
    }
}

/// A peer identifier (alias for `NodeId` in peer contexts).
pub type PeerId = NodeId;

/// Identity of the account that submitted a deploy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Derive a deterministic account from a small integer.
    pub fn from_seed(seed: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"dg-account");
        hasher.update(seed.to_le_bytes());
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..4]))
    }
}

// =============================================================================
// CLUSTER B: DEPLOYS
// =============================================================================

/// A submitted unit of work (contract bytes or call reference) from an account.
///
/// Immutable once submitted. The `nonce` orders deploys of one account
/// within and across blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deploy {
    /// Submitting account.
    pub account: AccountId,
    /// Contract bytes or call reference.
    pub payload: Vec<u8>,
    /// Per-account ordering counter.
    pub nonce: u64,
    /// Client-side creation time (milliseconds).
    pub timestamp: u64,
}

impl Deploy {
    /// Create a new deploy.
    pub fn new(account: AccountId, payload: Vec<u8>, nonce: u64, timestamp: u64) -> Self {
        Self {
            account,
            payload,
            nonce,
            timestamp,
        }
    }

    /// Compute the deploy hash.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.account.0);
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update((self.payload.len() as u64).to_le_bytes());
        hasher.update(&self.payload);
        hasher.finalize().into()
    }
}

// =============================================================================
// CLUSTER C: THE DAG
// =============================================================================

/// Block metadata covered by the block hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// DAG justifications, sorted and deduplicated. Empty only for genesis.
    pub parents: Vec<Hash>,
    /// Node that created the block.
    pub creator: NodeId,
    /// Per-creator sequence number, used for tie-breaking.
    pub seq_num: u64,
    /// Creation time (milliseconds since the epoch).
    pub timestamp: u64,
    /// Commitment to the ordered deploy list.
    pub deploys_root: Hash,
}

impl BlockHeader {
    /// Compute the content hash of this header.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update((self.parents.len() as u64).to_le_bytes());
        for parent in &self.parents {
            hasher.update(parent);
        }
        hasher.update(self.creator.0);
        hasher.update(self.seq_num.to_le_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.deploys_root);
        hasher.finalize().into()
    }
}

/// An immutable block in the DAG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Content hash of the header.
    pub hash: Hash,
    /// Hashed metadata.
    pub header: BlockHeader,
    /// Ordered deploys included in this block.
    pub deploys: Vec<Deploy>,
}

impl Block {
    /// Build a block, normalizing the parent set and computing its hash.
    pub fn new(
        mut parents: Vec<Hash>,
        creator: NodeId,
        seq_num: u64,
        timestamp: u64,
        deploys: Vec<Deploy>,
    ) -> Self {
        parents.sort_unstable();
        parents.dedup();
        let header = BlockHeader {
            parents,
            creator,
            seq_num,
            timestamp,
            deploys_root: deploys_root(&deploys),
        };
        Self {
            hash: header.hash(),
            header,
            deploys,
        }
    }

    /// The deterministic root block of a network.
    ///
    /// Every node of the same chain derives the same genesis, so nodes
    /// never need to gossip it.
    pub fn genesis(chain_name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"dg-genesis");
        hasher.update(chain_name.as_bytes());
        let header = BlockHeader {
            parents: Vec::new(),
            creator: NodeId::default(),
            seq_num: 0,
            timestamp: 0,
            deploys_root: hasher.finalize().into(),
        };
        Self {
            hash: header.hash(),
            header,
            deploys: Vec::new(),
        }
    }

    /// Parent hashes of this block.
    pub fn parents(&self) -> &[Hash] {
        &self.header.parents
    }

    /// True if the block has no parents.
    pub fn is_parentless(&self) -> bool {
        self.header.parents.is_empty()
    }

    /// Recompute the content hash and compare it with the carried one.
    ///
    /// Genesis carries a chain commitment instead of a deploy root, so only
    /// the header hash is checked for parentless blocks.
    pub fn verify_hash(&self) -> bool {
        if self.header.hash() != self.hash {
            return false;
        }
        self.is_parentless() || self.header.deploys_root == deploys_root(&self.deploys)
    }
}

/// Commitment over an ordered deploy list.
pub fn deploys_root(deploys: &[Deploy]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update((deploys.len() as u64).to_le_bytes());
    for deploy in deploys {
        hasher.update(deploy.hash());
    }
    hasher.finalize().into()
}
