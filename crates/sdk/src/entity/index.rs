use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Instant distribution index of a publisher, `{publisher}-{token}-{indexId}`.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct Index {
    pub id: SubgraphId,
    pub created_at: Instant,
    pub updated_at: Instant,
    /// Index ID chosen by the publisher, unique per publisher and token.
    #[debug("{index_id}")]
    pub index_id: BigNumber,
    #[debug("{index_value}")]
    pub index_value: BigNumber,
    pub total_subscriptions_with_units: u32,
    #[debug("{total_units_pending}")]
    pub total_units_pending: BigNumber,
    #[debug("{total_units_approved}")]
    pub total_units_approved: BigNumber,
    #[debug("{total_units}")]
    pub total_units: BigNumber,
    #[debug("{total_amount_distributed_until_updated_at}")]
    pub total_amount_distributed_until_updated_at: BigNumber,
    pub token: Address,
    pub publisher: Address,
    pub index_created_event: SubgraphId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexWire {
    id: SubgraphId,
    created_at_block_number: String,
    created_at_timestamp: String,
    updated_at_block_number: String,
    updated_at_timestamp: String,
    index_id: String,
    index_value: String,
    total_subscriptions_with_units: u32,
    total_units_pending: String,
    total_units_approved: String,
    total_units: String,
    total_amount_distributed_until_updated_at: String,
    token: IdRef,
    publisher: IdRef,
    index_created_event: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexFilter {
    pub id: Option<SubgraphId>,
    pub id_in: Option<Vec<SubgraphId>>,
    #[serde(rename = "indexId")]
    pub index_id: Option<String>,
    #[serde(rename = "indexId_in")]
    pub index_id_in: Option<Vec<String>>,
    pub token: Option<String>,
    pub token_in: Option<Vec<String>>,
    pub token_not: Option<String>,
    pub token_not_in: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub publisher_in: Option<Vec<String>>,
    pub publisher_not: Option<String>,
    pub publisher_not_in: Option<Vec<String>>,
    #[serde(rename = "totalUnits_gt")]
    pub total_units_gt: Option<String>,
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
pub enum IndexOrderBy {
    #[default]
    Id,
    CreatedAtBlockNumber,
    CreatedAtTimestamp,
    UpdatedAtBlockNumber,
    UpdatedAtTimestamp,
    IndexId,
    IndexValue,
    TotalUnits,
    TotalAmountDistributedUntilUpdatedAt,
}

impl OrderField for IndexOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for Index {
    const KIND: EntityKind = EntityKind::Index;
    const FIELDS: &'static str = "id createdAtBlockNumber createdAtTimestamp updatedAtBlockNumber \
        updatedAtTimestamp indexId indexValue totalSubscriptionsWithUnits totalUnitsPending \
        totalUnitsApproved totalUnits totalAmountDistributedUntilUpdatedAt token { id } \
        publisher { id } indexCreatedEvent { id }";

    type Wire = IndexWire;
    type Filter = IndexFilter;
    type OrderBy = IndexOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: IndexWire) -> Result<Self, NormalizationError> {
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
            index_id: p.big("indexId", &wire.index_id)?,
            index_value: p.big("indexValue", &wire.index_value)?,
            total_subscriptions_with_units: wire.total_subscriptions_with_units,
            total_units_pending: p.big("totalUnitsPending", &wire.total_units_pending)?,
            total_units_approved: p.big("totalUnitsApproved", &wire.total_units_approved)?,
            total_units: p.big("totalUnits", &wire.total_units)?,
            total_amount_distributed_until_updated_at: p.big(
                "totalAmountDistributedUntilUpdatedAt",
                &wire.total_amount_distributed_until_updated_at,
            )?,
            token: p.address("token", &wire.token.id)?,
            publisher: p.address("publisher", &wire.publisher.id)?,
            index_created_event: wire.index_created_event.id,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.publisher.into()],
        }
    }

    fn addresses_from_filter(filter: &IndexFilter) -> RelevantAddressesIntermediate {
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
            ],
        }
    }
}
