use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Subscription of an account to an [`super::Index`].
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct IndexSubscription {
    pub id: SubgraphId,
    pub created_at: Instant,
    pub updated_at: Instant,
    pub subscriber: Address,
    pub approved: bool,
    #[debug("{units}")]
    pub units: BigNumber,
    #[debug("{total_amount_received_until_updated_at}")]
    pub total_amount_received_until_updated_at: BigNumber,
    #[debug("{index_value_until_updated_at}")]
    pub index_value_until_updated_at: BigNumber,
    pub index: SubgraphId,
    #[debug("{index_id}")]
    pub index_id: BigNumber,
    pub token: Address,
    pub publisher: Address,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSubscriptionWire {
    id: SubgraphId,
    created_at_block_number: String,
    created_at_timestamp: String,
    updated_at_block_number: String,
    updated_at_timestamp: String,
    subscriber: IdRef,
    approved: bool,
    units: String,
    total_amount_received_until_updated_at: String,
    index_value_until_updated_at: String,
    index: IndexRefWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexRefWire {
    id: SubgraphId,
    index_id: String,
    token: IdRef,
    publisher: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSubscriptionFilter {
    pub id: Option<SubgraphId>,
    pub id_in: Option<Vec<SubgraphId>>,
    pub subscriber: Option<String>,
    pub subscriber_in: Option<Vec<String>>,
    pub subscriber_not: Option<String>,
    pub subscriber_not_in: Option<Vec<String>>,
    pub index: Option<SubgraphId>,
    pub index_in: Option<Vec<SubgraphId>>,
    pub approved: Option<bool>,
    pub units_gt: Option<String>,
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
pub enum IndexSubscriptionOrderBy {
    #[default]
    Id,
    CreatedAtBlockNumber,
    CreatedAtTimestamp,
    UpdatedAtBlockNumber,
    UpdatedAtTimestamp,
    Units,
    TotalAmountReceivedUntilUpdatedAt,
}

impl OrderField for IndexSubscriptionOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for IndexSubscription {
    const KIND: EntityKind = EntityKind::IndexSubscription;
    const FIELDS: &'static str = "id createdAtBlockNumber createdAtTimestamp \
        updatedAtBlockNumber updatedAtTimestamp subscriber { id } approved units \
        totalAmountReceivedUntilUpdatedAt indexValueUntilUpdatedAt \
        index { id indexId token { id } publisher { id } }";

    type Wire = IndexSubscriptionWire;
    type Filter = IndexSubscriptionFilter;
    type OrderBy = IndexSubscriptionOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: IndexSubscriptionWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            created_at: p.instant(
                "createdAtBlockNumber",
                &wire.created_at_block_number,
                "createdAtTimestamp",
                &wire.created_at_timestamp,
            )?,
            updated_at: p.instant(
                "updatedAtBlockNumber",
                &wire.updated_at_block_number,
                "updatedAtTimestamp",
                &wire.updated_at_timestamp,
            )?,
            subscriber: p.address("subscriber", &wire.subscriber.id)?,
            approved: wire.approved,
            units: p.big("units", &wire.units)?,
            total_amount_received_until_updated_at: p.big(
                "totalAmountReceivedUntilUpdatedAt",
                &wire.total_amount_received_until_updated_at,
            )?,
            index_value_until_updated_at: p
                .big("indexValueUntilUpdatedAt", &wire.index_value_until_updated_at)?,
            index_id: p.big("index.indexId", &wire.index.index_id)?,
            token: p.address("index.token", &wire.index.token.id)?,
            publisher: p.address("index.publisher", &wire.index.publisher.id)?,
            index: wire.index.id,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.subscriber.into(), self.publisher.into()],
        }
    }

    /// Filter names the subscriber only, the index is matched by its ID.
    fn addresses_from_filter(filter: &IndexSubscriptionFilter) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![],
            accounts: vec![
                (&filter.subscriber).into(),
                (&filter.subscriber_in).into(),
                (&filter.subscriber_not).into(),
                (&filter.subscriber_not_in).into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_nested_index_is_flattened() {
        let wire: IndexSubscriptionWire = serde_json::from_value(json!({
            "id": "sub-1",
            "createdAtBlockNumber": "100",
            "createdAtTimestamp": "1600000000",
            "updatedAtBlockNumber": "120",
            "updatedAtTimestamp": "1600000300",
            "subscriber": { "id": "0x00000000000000000000000000000000000000c1" },
            "approved": true,
            "units": "500",
            "totalAmountReceivedUntilUpdatedAt": "0",
            "indexValueUntilUpdatedAt": "0",
            "index": {
                "id": "idx-7",
                "indexId": "7",
                "token": { "id": "0x00000000000000000000000000000000000000a1" },
                "publisher": { "id": "0x00000000000000000000000000000000000000d1" },
            },
        }))
        .unwrap();
        let subscription = IndexSubscription::normalize(wire).unwrap();
        assert_eq!(subscription.index, "idx-7");
        assert_eq!(subscription.index_id, BigNumber::from_dec_str("7").unwrap());

        let resolved = subscription.addresses_from_result().resolve();
        assert_eq!(resolved.tokens, vec![address!("0x00000000000000000000000000000000000000a1")]);
        assert_eq!(
            resolved.accounts,
            vec![
                address!("0x00000000000000000000000000000000000000c1"),
                address!("0x00000000000000000000000000000000000000d1"),
            ]
        );
    }
}
