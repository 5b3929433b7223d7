use std::fmt::Display;

pub use alloy_primitives::{Address, I256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ID of an indexed entity, unique within its kind and chain.
pub type SubgraphId = String;

/// Arbitrary-precision on-chain integer (amounts, flow rates, units).
pub type BigNumber = I256;

pub type BlockNumber = u64;

/// Block timestamp, seconds since epoch.
pub type Timestamp = u64;

/// Instant in chain history an entity was created or updated at, or an event
/// was emitted at.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Default, Serialize)]
pub struct Instant {
    block_number: BlockNumber,
    timestamp: Timestamp,
}

impl Instant {
    pub fn new(block_number: BlockNumber, timestamp: Timestamp) -> Self {
        Self { block_number, timestamp }
    }

    pub fn block_number(&self) -> BlockNumber { self.block_number }

    pub fn timestamp(&self) -> Timestamp { self.timestamp }
}

impl Display for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp(self.timestamp as i64, 0) {
            Some(ts) => write!(f, "#{} @ {}", self.block_number, ts.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "#{} @ {}", self.block_number, self.timestamp),
        }
    }
}

/// Related entity as nested in raw responses, `{ "id": "..." }`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct IdRef {
    pub id: SubgraphId,
}
