use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// Event of a distribution that changed the index value.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct IndexUpdatedEvent {
    pub id: SubgraphId,
    pub emitted_at: Instant,
    pub transaction_hash: String,
    pub token: Address,
    pub publisher: Address,
    #[debug("{index_id}")]
    pub index_id: BigNumber,
    #[debug("{old_index_value}")]
    pub old_index_value: BigNumber,
    #[debug("{new_index_value}")]
    pub new_index_value: BigNumber,
    #[debug("{total_units_pending}")]
    pub total_units_pending: BigNumber,
    #[debug("{total_units_approved}")]
    pub total_units_approved: BigNumber,
    pub user_data: String,
    pub index: SubgraphId,
}

impl IndexUpdatedEvent {
    /// Amount distributed per unit by this update.
    pub fn index_value_delta(&self) -> BigNumber { self.new_index_value - self.old_index_value }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexUpdatedEventWire {
    id: SubgraphId,
    block_number: String,
    timestamp: String,
    transaction_hash: String,
    token: String,
    publisher: String,
    index_id: String,
    old_index_value: String,
    new_index_value: String,
    total_units_pending: String,
    total_units_approved: String,
    user_data: String,
    index: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexUpdatedEventFilter {
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
    #[serde(rename = "indexId")]
    pub index_id: Option<String>,
    pub index: Option<SubgraphId>,
    #[serde(rename = "transactionHash")]
    pub transaction_hash: Option<String>,
    #[serde(rename = "blockNumber_gte")]
    pub block_number_gte: Option<String>,
    #[serde(rename = "timestamp_gte")]
    pub timestamp_gte: Option<String>,
    #[serde(rename = "timestamp_lte")]
    pub timestamp_lte: Option<String>,
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
pub enum IndexUpdatedEventOrderBy {
    #[default]
    Id,
    BlockNumber,
    Timestamp,
    IndexId,
    NewIndexValue,
}

impl OrderField for IndexUpdatedEventOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for IndexUpdatedEvent {
    const KIND: EntityKind = EntityKind::IndexUpdatedEvent;
    const FIELDS: &'static str = "id blockNumber timestamp transactionHash token publisher \
        indexId oldIndexValue newIndexValue totalUnitsPending totalUnitsApproved userData \
        index { id }";

    type Wire = IndexUpdatedEventWire;
    type Filter = IndexUpdatedEventFilter;
    type OrderBy = IndexUpdatedEventOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: IndexUpdatedEventWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            emitted_at: p.instant("blockNumber", &wire.block_number, "timestamp", &wire.timestamp)?,
            token: p.address("token", &wire.token)?,
            publisher: p.address("publisher", &wire.publisher)?,
            index_id: p.big("indexId", &wire.index_id)?,
            old_index_value: p.big("oldIndexValue", &wire.old_index_value)?,
            new_index_value: p.big("newIndexValue", &wire.new_index_value)?,
            total_units_pending: p.big("totalUnitsPending", &wire.total_units_pending)?,
            total_units_approved: p.big("totalUnitsApproved", &wire.total_units_approved)?,
            transaction_hash: wire.transaction_hash,
            user_data: wire.user_data,
            index: wire.index.id,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.publisher.into()],
        }
    }

    fn addresses_from_filter(filter: &IndexUpdatedEventFilter) -> RelevantAddressesIntermediate {
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
