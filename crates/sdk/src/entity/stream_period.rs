use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Period of a stream with a constant flow rate.
///
/// A new period starts on every flow update, the period in progress has no
/// `stopped_*` values yet.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct StreamPeriod {
    pub id: SubgraphId,
    #[debug("{flow_rate}")]
    pub flow_rate: BigNumber,
    pub started_at: Instant,
    pub stopped_at: Option<Instant>,
    /// Amount streamed over the whole period, known once it stops.
    pub total_amount_streamed: Option<BigNumber>,
    pub token: Address,
    pub stream: SubgraphId,
    pub sender: Address,
    pub receiver: Address,
    pub started_at_event: SubgraphId,
    pub stopped_at_event: Option<SubgraphId>,
}

impl StreamPeriod {
    pub fn is_active(&self) -> bool { self.stopped_at.is_none() }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamPeriodWire {
    id: SubgraphId,
    flow_rate: String,
    started_at_block_number: String,
    started_at_timestamp: String,
    stopped_at_block_number: Option<String>,
    stopped_at_timestamp: Option<String>,
    total_amount_streamed: Option<String>,
    token: IdRef,
    stream: IdRef,
    sender: IdRef,
    receiver: IdRef,
    started_at_event: IdRef,
    stopped_at_event: Option<IdRef>,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamPeriodFilter {
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
    pub stream: Option<SubgraphId>,
    pub stream_in: Option<Vec<SubgraphId>>,
    #[serde(rename = "startedAtTimestamp_gte")]
    pub started_at_timestamp_gte: Option<String>,
    #[serde(rename = "startedAtTimestamp_lte")]
    pub started_at_timestamp_lte: Option<String>,
    #[serde(rename = "stoppedAtTimestamp_gte")]
    pub stopped_at_timestamp_gte: Option<String>,
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
pub enum StreamPeriodOrderBy {
    #[default]
    Id,
    FlowRate,
    StartedAtBlockNumber,
    StartedAtTimestamp,
    StoppedAtBlockNumber,
    StoppedAtTimestamp,
    TotalAmountStreamed,
}

impl OrderField for StreamPeriodOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for StreamPeriod {
    const KIND: EntityKind = EntityKind::StreamPeriod;
    const FIELDS: &'static str = "id flowRate startedAtBlockNumber startedAtTimestamp \
        stoppedAtBlockNumber stoppedAtTimestamp totalAmountStreamed token { id } stream { id } \
        sender { id } receiver { id } startedAtEvent { id } stoppedAtEvent { id }";

    type Wire = StreamPeriodWire;
    type Filter = StreamPeriodFilter;
    type OrderBy = StreamPeriodOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: StreamPeriodWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            flow_rate: p.big("flowRate", &wire.flow_rate)?,
            started_at: p.instant(
                "startedAtBlockNumber",
                &wire.started_at_block_number,
                "startedAtTimestamp",
                &wire.started_at_timestamp,
            )?,
            stopped_at: p.opt_instant(
                "stoppedAtBlockNumber",
                wire.stopped_at_block_number.as_deref(),
                "stoppedAtTimestamp",
                wire.stopped_at_timestamp.as_deref(),
            )?,
            total_amount_streamed: p
                .opt_big("totalAmountStreamed", wire.total_amount_streamed.as_deref())?,
            token: p.address("token", &wire.token.id)?,
            stream: wire.stream.id,
            sender: p.address("sender", &wire.sender.id)?,
            receiver: p.address("receiver", &wire.receiver.id)?,
            started_at_event: wire.started_at_event.id,
            stopped_at_event: wire.stopped_at_event.map(|e| e.id),
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.sender.into(), self.receiver.into()],
        }
    }

    fn addresses_from_filter(filter: &StreamPeriodFilter) -> RelevantAddressesIntermediate {
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
