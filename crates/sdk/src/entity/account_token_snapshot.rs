use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, BigNumber, IdRef, Instant, SubgraphId},
};

/// State of a single token for a single account, `{account}-{token}`.
#[derive(Clone, PartialEq, Eq, Serialize, derive_more::Debug)]
pub struct AccountTokenSnapshot {
    pub id: SubgraphId,
    pub account: Address,
    pub token: Address,
    pub updated_at: Instant,
    pub total_number_of_active_streams: u32,
    pub total_number_of_closed_streams: u32,
    pub total_subscriptions_with_units: u32,
    pub total_approved_subscriptions: u32,
    #[debug("{balance_until_updated_at}")]
    pub balance_until_updated_at: BigNumber,
    /// Inflow minus outflow, negative for net senders.
    #[debug("{total_net_flow_rate}")]
    pub total_net_flow_rate: BigNumber,
    #[debug("{total_inflow_rate}")]
    pub total_inflow_rate: BigNumber,
    #[debug("{total_outflow_rate}")]
    pub total_outflow_rate: BigNumber,
    #[debug("{total_amount_streamed_until_updated_at}")]
    pub total_amount_streamed_until_updated_at: BigNumber,
    #[debug("{total_amount_transferred_until_updated_at}")]
    pub total_amount_transferred_until_updated_at: BigNumber,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTokenSnapshotWire {
    id: SubgraphId,
    updated_at_block_number: String,
    updated_at_timestamp: String,
    total_number_of_active_streams: u32,
    total_number_of_closed_streams: u32,
    total_subscriptions_with_units: u32,
    total_approved_subscriptions: u32,
    balance_until_updated_at: String,
    total_net_flow_rate: String,
    total_inflow_rate: String,
    total_outflow_rate: String,
    total_amount_streamed_until_updated_at: String,
    total_amount_transferred_until_updated_at: String,
    account: IdRef,
    token: IdRef,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountTokenSnapshotFilter {
    pub id: Option<SubgraphId>,
    pub id_in: Option<Vec<SubgraphId>>,
    pub account: Option<String>,
    pub account_in: Option<Vec<String>>,
    pub account_not: Option<String>,
    pub account_not_in: Option<Vec<String>>,
    pub token: Option<String>,
    pub token_in: Option<Vec<String>>,
    pub token_not: Option<String>,
    pub token_not_in: Option<Vec<String>>,
    #[serde(rename = "totalNumberOfActiveStreams_gt")]
    pub total_number_of_active_streams_gt: Option<u32>,
    #[serde(rename = "totalNetFlowRate_not")]
    pub total_net_flow_rate_not: Option<String>,
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
pub enum AccountTokenSnapshotOrderBy {
    #[default]
    Id,
    UpdatedAtBlockNumber,
    UpdatedAtTimestamp,
    TotalNumberOfActiveStreams,
    BalanceUntilUpdatedAt,
    TotalNetFlowRate,
    TotalInflowRate,
    TotalOutflowRate,
}

impl OrderField for AccountTokenSnapshotOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for AccountTokenSnapshot {
    const KIND: EntityKind = EntityKind::AccountTokenSnapshot;
    const FIELDS: &'static str = "id updatedAtBlockNumber updatedAtTimestamp \
        totalNumberOfActiveStreams totalNumberOfClosedStreams totalSubscriptionsWithUnits \
        totalApprovedSubscriptions balanceUntilUpdatedAt totalNetFlowRate totalInflowRate \
        totalOutflowRate totalAmountStreamedUntilUpdatedAt totalAmountTransferredUntilUpdatedAt \
        account { id } token { id }";

    type Wire = AccountTokenSnapshotWire;
    type Filter = AccountTokenSnapshotFilter;
    type OrderBy = AccountTokenSnapshotOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: AccountTokenSnapshotWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            account: p.address("account", &wire.account.id)?,
            token: p.address("token", &wire.token.id)?,
            updated_at: p.instant(
                "updatedAtBlockNumber",
                &wire.updated_at_block_number,
                "updatedAtTimestamp",
                &wire.updated_at_timestamp,
            )?,
            total_number_of_active_streams: wire.total_number_of_active_streams,
            total_number_of_closed_streams: wire.total_number_of_closed_streams,
            total_subscriptions_with_units: wire.total_subscriptions_with_units,
            total_approved_subscriptions: wire.total_approved_subscriptions,
            balance_until_updated_at: p
                .big("balanceUntilUpdatedAt", &wire.balance_until_updated_at)?,
            total_net_flow_rate: p.big("totalNetFlowRate", &wire.total_net_flow_rate)?,
            total_inflow_rate: p.big("totalInflowRate", &wire.total_inflow_rate)?,
            total_outflow_rate: p.big("totalOutflowRate", &wire.total_outflow_rate)?,
            total_amount_streamed_until_updated_at: p.big(
                "totalAmountStreamedUntilUpdatedAt",
                &wire.total_amount_streamed_until_updated_at,
            )?,
            total_amount_transferred_until_updated_at: p.big(
                "totalAmountTransferredUntilUpdatedAt",
                &wire.total_amount_transferred_until_updated_at,
            )?,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.token.into()],
            accounts: vec![self.account.into()],
        }
    }

    fn addresses_from_filter(filter: &AccountTokenSnapshotFilter) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![
                (&filter.token).into(),
                (&filter.token_in).into(),
                (&filter.token_not).into(),
                (&filter.token_not_in).into(),
            ],
            accounts: vec![
                (&filter.account).into(),
                (&filter.account_in).into(),
                (&filter.account_not).into(),
                (&filter.account_not_in).into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use serde_json::json;

    use super::*;

    fn row(net_flow_rate: &str) -> serde_json::Value {
        json!({
            "id": "0x00000000000000000000000000000000000000b1-0x00000000000000000000000000000000000000a1",
            "updatedAtBlockNumber": "7000000",
            "updatedAtTimestamp": "1650000000",
            "totalNumberOfActiveStreams": 2,
            "totalNumberOfClosedStreams": 5,
            "totalSubscriptionsWithUnits": 0,
            "totalApprovedSubscriptions": 0,
            "balanceUntilUpdatedAt": "1000000000000000000000",
            "totalNetFlowRate": net_flow_rate,
            "totalInflowRate": "0",
            "totalOutflowRate": "38580246913580",
            "totalAmountStreamedUntilUpdatedAt": "0",
            "totalAmountTransferredUntilUpdatedAt": "0",
            "account": { "id": "0x00000000000000000000000000000000000000b1" },
            "token": { "id": "0x00000000000000000000000000000000000000a1" },
        })
    }

    #[test]
    fn test_signed_net_flow_rate() {
        let wire = serde_json::from_value(row("-38580246913580")).unwrap();
        let snapshot = AccountTokenSnapshot::normalize(wire).unwrap();
        assert!(snapshot.total_net_flow_rate.is_negative());
        assert_eq!(snapshot.total_net_flow_rate, -snapshot.total_outflow_rate);
        assert_eq!(snapshot.account, address!("0x00000000000000000000000000000000000000b1"));

        let resolved = snapshot.addresses_from_result().resolve();
        assert_eq!(resolved.tokens, vec![snapshot.token]);
        assert_eq!(resolved.accounts, vec![snapshot.account]);
    }

    #[test]
    fn test_malformed_number_fails() {
        let wire = serde_json::from_value(row("-3.5e10")).unwrap();
        assert!(matches!(
            AccountTokenSnapshot::normalize(wire),
            Err(NormalizationError::Number { field: "totalNetFlowRate", .. })
        ));
    }
}
