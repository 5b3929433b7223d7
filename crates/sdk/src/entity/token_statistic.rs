use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Aggregated state of a token across all accounts. ID is the token address.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct TokenStatistic {
    pub id: SubgraphId,
    pub token: Address,
    pub updated_at: Instant,
    pub total_number_of_active_streams: u32,
    pub total_number_of_closed_streams: u32,
    pub total_number_of_indexes: u32,
    pub total_number_of_active_indexes: u32,
    pub total_subscriptions_with_units: u32,
    pub total_approved_subscriptions: u32,
    #[debug("{total_deposit}")]
    pub total_deposit: BigNumber,
    #[debug("{total_outflow_rate}")]
    pub total_outflow_rate: BigNumber,
    #[debug("{total_amount_streamed_until_updated_at}")]
    pub total_amount_streamed_until_updated_at: BigNumber,
    #[debug("{total_amount_transferred_until_updated_at}")]
    pub total_amount_transferred_until_updated_at: BigNumber,
    #[debug("{total_amount_distributed_until_updated_at}")]
    pub total_amount_distributed_until_updated_at: BigNumber,
    #[debug("{total_supply}")]
    pub total_supply: BigNumber,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatisticWire {
    id: SubgraphId,
    updated_at_block_number: String,
    updated_at_timestamp: String,
    total_number_of_active_streams: u32,
    total_number_of_closed_streams: u32,
    total_number_of_indexes: u32,
    total_number_of_active_indexes: u32,
    total_subscriptions_with_units: u32,
    total_approved_subscriptions: u32,
    total_deposit: String,
    total_outflow_rate: String,
    total_amount_streamed_until_updated_at: String,
    total_amount_transferred_until_updated_at: String,
    total_amount_distributed_until_updated_at: String,
    total_supply: String,
    token: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenStatisticFilter {
    pub id: Option<String>,
    pub id_in: Option<Vec<String>>,
    pub id_not: Option<String>,
    pub id_not_in: Option<Vec<String>>,
    pub token: Option<String>,
    pub token_in: Option<Vec<String>>,
    pub token_not: Option<String>,
    pub token_not_in: Option<Vec<String>>,
    #[serde(rename = "totalNumberOfActiveStreams_gt")]
    pub total_number_of_active_streams_gt: Option<u32>,
    #[serde(rename = "updatedAtTimestamp_gte")]
    pub updated_at_timestamp_gte: Option<String>,
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
pub enum TokenStatisticOrderBy {
    #[default]
    Id,
    UpdatedAtBlockNumber,
    UpdatedAtTimestamp,
    TotalNumberOfActiveStreams,
    TotalNumberOfClosedStreams,
    TotalOutflowRate,
    TotalSupply,
}

impl OrderField for TokenStatisticOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for TokenStatistic {
    const KIND: EntityKind = EntityKind::TokenStatistic;
    const FIELDS: &'static str = "id updatedAtBlockNumber updatedAtTimestamp \
        totalNumberOfActiveStreams totalNumberOfClosedStreams totalNumberOfIndexes \
        totalNumberOfActiveIndexes totalSubscriptionsWithUnits totalApprovedSubscriptions \
        totalDeposit totalOutflowRate totalAmountStreamedUntilUpdatedAt \
        totalAmountTransferredUntilUpdatedAt totalAmountDistributedUntilUpdatedAt totalSupply \
        token { id }";

    type Wire = TokenStatisticWire;
    type Filter = TokenStatisticFilter;
    type OrderBy = TokenStatisticOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: TokenStatisticWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            token: p.address("token", &wire.token.id)?,
            updated_at: p.instant(
                "updatedAtBlockNumber",
                &wire.updated_at_block_number,
                "updatedAtTimestamp",
                &wire.updated_at_timestamp,
            )?,
            total_number_of_active_streams: wire.total_number_of_active_streams,
            total_number_of_closed_streams: wire.total_number_of_closed_streams,
            total_number_of_indexes: wire.total_number_of_indexes,
            total_number_of_active_indexes: wire.total_number_of_active_indexes,
            total_subscriptions_with_units: wire.total_subscriptions_with_units,
            total_approved_subscriptions: wire.total_approved_subscriptions,
            total_deposit: p.big("totalDeposit", &wire.total_deposit)?,
            total_outflow_rate: p.big("totalOutflowRate", &wire.total_outflow_rate)?,
            total_amount_streamed_until_updated_at: p.big(
                "totalAmountStreamedUntilUpdatedAt",
                &wire.total_amount_streamed_until_updated_at,
            )?,
            total_amount_transferred_until_updated_at: p.big(
                "totalAmountTransferredUntilUpdatedAt",
                &wire.total_amount_transferred_until_updated_at,
            )?,
            total_amount_distributed_until_updated_at: p.big(
                "totalAmountDistributedUntilUpdatedAt",
                &wire.total_amount_distributed_until_updated_at,
            )?,
            total_supply: p.big("totalSupply", &wire.total_supply)?,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate { tokens: vec![self.token.into()], accounts: vec![] }
    }

    fn addresses_from_filter(filter: &TokenStatisticFilter) -> RelevantAddressesIntermediate {
        // Statistic ID is the token address
        RelevantAddressesIntermediate {
            tokens: vec![
                (&filter.id).into(),
                (&filter.id_in).into(),
                (&filter.id_not).into(),
                (&filter.id_not_in).into(),
                (&filter.token).into(),
                (&filter.token_in).into(),
                (&filter.token_not).into(),
                (&filter.token_not_in).into(),
            ],
            accounts: vec![],
        }
    }
}
