//! # Block Store (dg-02)
//!
//! Content-addressed store of blocks and their ancestry DAG, plus the
//! per-hash record of peers known to already hold each block.
//!
//! ## Invariants
//!
//! - A block is stored only after every parent is stored. `put` with a
//!   missing parent fails with [`StoreError::MissingParent`] and leaves the
//!   store untouched; the caller fetches the parents and retries.
//! - Storing a known hash again is a no-op returning
//!   [`PutOutcome::AlreadyKnown`].
//! - Insertion is atomic with respect to readers.

pub mod domain;

pub use domain::{BlockStore, PutOutcome, StoreError, StoreStats};
