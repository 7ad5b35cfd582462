//! # Domain Layer for the Block Store

mod errors;
mod store;

pub use errors::*;
pub use store::*;
