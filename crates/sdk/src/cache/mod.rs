//! Cache tags of query results.
//!
//! Tags are scoped by chain, [`CacheTagKind`] and, when the result depends on
//! particular tokens or accounts, by address. A reactive cache stores each
//! result under its tags and invalidates every result carrying a tag touched
//! by a mutation or an observed on-chain event.

mod endpoint;
mod tags;

pub use endpoint::*;
pub use tags::*;
