//! Token-streaming indexing service SDK.
//!
//! # Overview
//!
//! Typed, paginated queries over the GraphQL indexing service that tracks
//! on-chain token streams, indexes and their statistics, plus the cache tags
//! a reactive cache needs to invalidate exactly the affected results.
//!
//! Use [`query::QueryHandler`] to get/list a particular [`entity`] kind
//! through any [`query::SubgraphClient`], then [`cache::provide_tags`] (or the
//! [`cache::Endpoint`] shortcut) to compute tags for the cached result.
//!
//! The SDK performs no I/O on its own: the transport, retries and the cache
//! store belong to the host application.
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Exclusion operators (`_not`, `_not_in`) are always tagged, trading
//!   cache precision for never serving stale results.
//!
//! * Only a subset of the indexing service filter predicates is typed, see
//!   the filter of each [`entity`].
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `display` | yes | Enables [`tabled::Tabled`] implementation for cache tags. |
//! | `testing` | yes | Enables [`testing`] module. |
//!
//! # Testing
//!
//! [`testing`] module provides an in-memory indexing service evaluating
//! filters, ordering and pagination the same way the real one does.

pub mod cache;
pub mod entity;
pub mod error;
pub mod num;
pub mod query;
#[cfg(feature = "testing")]
pub mod testing;
pub mod types;

#[derive(Clone, Debug)]
/// Chain the indexing service is tracking.
pub struct Chain {
    chain_id: u64,
    name: &'static str,
    subgraph_endpoint: String,
}

const HOSTED_SERVICE: &str = "https://api.thegraph.com/subgraphs/name/superfluid-finance";

impl Chain {
    pub fn goerli() -> Self { Self::hosted(5, "goerli", "protocol-v1-goerli") }

    pub fn matic() -> Self { Self::hosted(137, "matic", "protocol-v1-matic") }

    pub fn xdai() -> Self { Self::hosted(100, "xdai", "protocol-v1-xdai") }

    pub fn mumbai() -> Self { Self::hosted(80001, "mumbai", "protocol-v1-mumbai") }

    /// Preset for a known chain ID.
    pub fn by_id(chain_id: u64) -> Option<Self> {
        [Self::goerli(), Self::matic(), Self::xdai(), Self::mumbai()]
            .into_iter()
            .find(|c| c.chain_id == chain_id)
    }

    pub fn custom(chain_id: u64, subgraph_endpoint: impl Into<String>) -> Self {
        Self { chain_id, name: "custom", subgraph_endpoint: subgraph_endpoint.into() }
    }

    fn hosted(chain_id: u64, name: &'static str, subgraph: &str) -> Self {
        Self { chain_id, name, subgraph_endpoint: format!("{HOSTED_SERVICE}/{subgraph}") }
    }

    pub fn chain_id(&self) -> u64 { self.chain_id }

    pub fn name(&self) -> &'static str { self.name }

    pub fn subgraph_endpoint(&self) -> &str { &self.subgraph_endpoint }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_presets() {
        let chain = Chain::by_id(137).unwrap();
        assert_eq!(chain.name(), "matic");
        assert!(chain.subgraph_endpoint().ends_with("/protocol-v1-matic"));
        assert!(Chain::by_id(1).is_none());

        let custom = Chain::custom(31337, "http://localhost:8000/subgraphs/name/local");
        assert_eq!(custom.chain_id(), 31337);
        assert_eq!(custom.subgraph_endpoint(), "http://localhost:8000/subgraphs/name/local");
    }
}
