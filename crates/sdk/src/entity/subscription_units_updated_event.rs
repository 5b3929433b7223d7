use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Event of a publisher changing units of a subscriber.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct SubscriptionUnitsUpdatedEvent {
    pub id: SubgraphId,
    pub emitted_at: Instant,
    pub transaction_hash: String,
    pub token: Address,
    pub publisher: Address,
    pub subscriber: Address,
    #[debug("{index_id}")]
    pub index_id: BigNumber,
    #[debug("{units}")]
    pub units: BigNumber,
    #[debug("{old_units}")]
    pub old_units: BigNumber,
    pub user_data: String,
    pub subscription: SubgraphId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUnitsUpdatedEventWire {
    id: SubgraphId,
    block_number: String,
    timestamp: String,
    transaction_hash: String,
    token: String,
    publisher: String,
    subscriber: String,
    index_id: String,
    units: String,
    old_units: String,
    user_data: String,
    subscription: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionUnitsUpdatedEventFilter {
    pub id: Option<SubgraphId>,
    pub id_in: Option<Vec<SubgraphId>>,
    pub token: Option<String>,
    pub token_in: Option<Vec<String>>,
    pub token_not: Option<String>,
    pub token_not_in: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub publisher_in: Option<Vec<String>>,
    pub publisher_not: Option<String>,
    pub publisher_not_in: Option<Vec<String>>,
    pub subscriber: Option<String>,
    pub subscriber_in: Option<Vec<String>>,
    pub subscriber_not: Option<String>,
    pub subscriber_not_in: Option<Vec<String>>,
    #[serde(rename = "indexId")]
    pub index_id: Option<String>,
    pub subscription: Option<SubgraphId>,
    #[serde(rename = "transactionHash")]
    pub transaction_hash: Option<String>,
    #[serde(rename = "blockNumber_gte")]
    pub block_number_gte: Option<String>,
    #[serde(rename = "timestamp_gte")]
    pub timestamp_gte: Option<String>,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SubscriptionUnitsUpdatedEventOrderBy {
    #[default]
    Id,
    BlockNumber,
    Timestamp,
    Units,
}

impl OrderField for SubscriptionUnitsUpdatedEventOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for SubscriptionUnitsUpdatedEvent {
    const KIND: EntityKind = EntityKind::SubscriptionUnitsUpdatedEvent;
    const FIELDS: &'static str = "id blockNumber timestamp transactionHash token publisher \
        subscriber indexId units oldUnits userData subscription { id }";

    type Wire = SubscriptionUnitsUpdatedEventWire;
    type Filter = SubscriptionUnitsUpdatedEventFilter;
    type OrderBy = SubscriptionUnitsUpdatedEventOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: SubscriptionUnitsUpdatedEventWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            emitted_at: p.instant("blockNumber", &wire.block_number, "timestamp", &wire.timestamp)?,
            token: p.address("token", &wire.token)?,
            publisher: p.address("publisher", &wire.publisher)?,
            subscriber: p.address("subscriber", &wire.subscriber)?,
            index_id: p.big("indexId", &wire.index_id)?,
            units: p.big("units", &wire.units)?,
            old_units: p.big("oldUnits", &wire.old_units)?,
            transaction_hash: wire.transaction_hash,
            user_data: wire.user_data,
            subscription: wire.subscription.id,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.publisher.into(), self.subscriber.into()],
        }
    }

    fn addresses_from_filter(
        filter: &SubscriptionUnitsUpdatedEventFilter,
    ) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![
                (&filter.token).into(),
                (&filter.token_in).into(),
                (&filter.token_not).into(),
                (&filter.token_not_in).into(),
            ],
            accounts: vec![
                (&filter.publisher).into(),
                (&filter.publisher_in).into(),
                (&filter.publisher_not).into(),
                (&filter.publisher_not_in).into(),
                (&filter.subscriber).into(),
                (&filter.subscriber_in).into(),
                (&filter.subscriber_not).into(),
                (&filter.subscriber_not_in).into(),
            ],
        }
    }
}
