use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Stream of a token from sender to receiver. Kept after the flow is
/// deleted, with zero flow rate.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct Stream {
    pub id: SubgraphId,
    pub created_at: Instant,
    pub updated_at: Instant,
    #[debug("{current_flow_rate}")]
    pub current_flow_rate: BigNumber,
    #[debug("{streamed_until_updated_at}")]
    pub streamed_until_updated_at: BigNumber,
    pub token: Address,
    pub sender: Address,
    pub receiver: Address,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamWire {
    id: SubgraphId,
    created_at_block_number: String,
    created_at_timestamp: String,
    updated_at_block_number: String,
    updated_at_timestamp: String,
    current_flow_rate: String,
    streamed_until_updated_at: String,
    token: IdRef,
    sender: IdRef,
    receiver: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamFilter {
    pub id: Option<SubgraphId>,
    pub id_in: Option<Vec<SubgraphId>>,
    pub token: Option<String>,
    pub token_in: Option<Vec<String>>,
    pub token_not: Option<String>,
    pub token_not_in: Option<Vec<String>>,
    pub sender: Option<String>,
    pub sender_in: Option<Vec<String>>,
    pub sender_not: Option<String>,
    pub sender_not_in: Option<Vec<String>>,
    pub receiver: Option<String>,
    pub receiver_in: Option<Vec<String>>,
    pub receiver_not: Option<String>,
    pub receiver_not_in: Option<Vec<String>>,
    #[serde(rename = "currentFlowRate")]
    pub current_flow_rate: Option<String>,
    #[serde(rename = "currentFlowRate_not")]
    pub current_flow_rate_not: Option<String>,
    #[serde(rename = "currentFlowRate_gt")]
    pub current_flow_rate_gt: Option<String>,
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
pub enum StreamOrderBy {
    #[default]
    Id,
    CreatedAtBlockNumber,
    CreatedAtTimestamp,
    UpdatedAtBlockNumber,
    UpdatedAtTimestamp,
    CurrentFlowRate,
    StreamedUntilUpdatedAt,
}

impl OrderField for StreamOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for Stream {
    const KIND: EntityKind = EntityKind::Stream;
    const FIELDS: &'static str = "id createdAtBlockNumber createdAtTimestamp updatedAtBlockNumber \
        updatedAtTimestamp currentFlowRate streamedUntilUpdatedAt token { id } sender { id } \
        receiver { id }";

    type Wire = StreamWire;
    type Filter = StreamFilter;
    type OrderBy = StreamOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: StreamWire) -> Result<Self, NormalizationError> {
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
            current_flow_rate: p.big("currentFlowRate", &wire.current_flow_rate)?,
            streamed_until_updated_at: p
                .big("streamedUntilUpdatedAt", &wire.streamed_until_updated_at)?,
            token: p.address("token", &wire.token.id)?,
            sender: p.address("sender", &wire.sender.id)?,
            receiver: p.address("receiver", &wire.receiver.id)?,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.sender.into(), self.receiver.into()],
        }
    }

    fn addresses_from_filter(filter: &StreamFilter) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![
                (&filter.token).into(),
                (&filter.token_in).into(),
                (&filter.token_not).into(),
                (&filter.token_not_in).into(),
            ],
            accounts: vec![
                (&filter.sender).into(),
                (&filter.sender_in).into(),
                (&filter.sender_not).into(),
                (&filter.sender_not_in).into(),
                (&filter.receiver).into(),
                (&filter.receiver_in).into(),
                (&filter.receiver_not).into(),
                (&filter.receiver_not_in).into(),
            ],
        }
    }
}
