//! # Domain Layer for the Peer Table

mod entities;
mod errors;
mod table;

pub use entities::*;
pub use errors::*;
pub use table::*;
