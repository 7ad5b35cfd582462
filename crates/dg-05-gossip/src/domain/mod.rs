//! # Domain Layer for Block Gossip
//!
//! Pure bookkeeping with no I/O: the fetch table, the retry queue and the
//! orphan pool. The service drives them under its own locks.

mod config;
mod fetch;
mod orphans;
mod stats;

pub use config::*;
pub use fetch::*;
pub use orphans::*;
pub use stats::*;
