//! Entity kinds tracked by the indexing service.
//!
//! Each kind comes with the normalized entity, its raw response row
//! (`*Wire`), list filter (`*Filter`) and order field (`*OrderBy`).
//!
//! Address-valued filter fields take raw strings, the same way the indexing
//! service `where` input does. Values that are not addresses still reach the
//! service, but are not considered for cache tags.

mod account;
mod account_token_snapshot;
mod index;
mod index_subscription;
mod index_updated_event;
mod stream;
mod stream_period;
mod subscription_units_updated_event;
mod token;
mod token_statistic;

pub use account::*;
pub use account_token_snapshot::*;
pub use index::*;
pub use index_subscription::*;
pub use index_updated_event::*;
pub use stream::*;
pub use stream_period::*;
pub use subscription_units_updated_event::*;
pub use token::*;
pub use token_statistic::*;

/// Kind of indexed entity.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Account,
    Token,
    TokenStatistic,
    AccountTokenSnapshot,
    Stream,
    StreamPeriod,
    Index,
    IndexSubscription,
    IndexUpdatedEvent,
    SubscriptionUnitsUpdatedEvent,
}

impl EntityKind {
    /// Entity type name in the indexing service schema.
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Account => "Account",
            EntityKind::Token => "Token",
            EntityKind::TokenStatistic => "TokenStatistic",
            EntityKind::AccountTokenSnapshot => "AccountTokenSnapshot",
            EntityKind::Stream => "Stream",
            EntityKind::StreamPeriod => "StreamPeriod",
            EntityKind::Index => "Index",
            EntityKind::IndexSubscription => "IndexSubscription",
            EntityKind::IndexUpdatedEvent => "IndexUpdatedEvent",
            EntityKind::SubscriptionUnitsUpdatedEvent => "SubscriptionUnitsUpdatedEvent",
        }
    }

    /// Name of the list query collection.
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::Account => "accounts",
            EntityKind::Token => "tokens",
            EntityKind::TokenStatistic => "tokenStatistics",
            EntityKind::AccountTokenSnapshot => "accountTokenSnapshots",
            EntityKind::Stream => "streams",
            EntityKind::StreamPeriod => "streamPeriods",
            EntityKind::Index => "indexes",
            EntityKind::IndexSubscription => "indexSubscriptions",
            EntityKind::IndexUpdatedEvent => "indexUpdatedEvents",
            EntityKind::SubscriptionUnitsUpdatedEvent => "subscriptionUnitsUpdatedEvents",
        }
    }
}
