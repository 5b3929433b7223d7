use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::Parser,
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, Instant, SubgraphId},
};

/// Account that ever interacted with the protocol. ID is the account address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: SubgraphId,
    pub address: Address,
    pub created_at: Instant,
    pub updated_at: Instant,
    pub is_super_app: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWire {
    id: SubgraphId,
    created_at_block_number: String,
    created_at_timestamp: String,
    updated_at_block_number: String,
    updated_at_timestamp: String,
    is_super_app: bool,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountFilter {
    pub id: Option<String>,
    pub id_in: Option<Vec<String>>,
    pub id_not: Option<String>,
    pub id_not_in: Option<Vec<String>>,
    #[serde(rename = "isSuperApp")]
    pub is_super_app: Option<bool>,
    #[serde(rename = "createdAtTimestamp_gte")]
    pub created_at_timestamp_gte: Option<String>,
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
pub enum AccountOrderBy {
    #[default]
    Id,
    CreatedAtBlockNumber,
    CreatedAtTimestamp,
    UpdatedAtBlockNumber,
    UpdatedAtTimestamp,
    IsSuperApp,
}

impl OrderField for AccountOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;
    const FIELDS: &'static str = "id createdAtBlockNumber createdAtTimestamp updatedAtBlockNumber \
        updatedAtTimestamp isSuperApp";

    type Wire = AccountWire;
    type Filter = AccountFilter;
    type OrderBy = AccountOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: AccountWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            address: p.address("id", &wire.id)?,
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
            is_super_app: wire.is_super_app,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate { tokens: vec![], accounts: vec![self.address.into()] }
    }

    fn addresses_from_filter(filter: &AccountFilter) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![],
            accounts: vec![
                (&filter.id).into(),
                (&filter.id_in).into(),
                (&filter.id_not).into(),
                (&filter.id_not_in).into(),
            ],
        }
    }
}
