//! # Domain Layer for the Deploy Mempool

mod errors;
mod pool;

pub use errors::*;
pub use pool::*;
