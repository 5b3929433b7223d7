use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::{
    error::NormalizationError,
    num::{Converter, Parser},
    query::{Entity, OrderField, RelevantAddressesIntermediate},
    types::{Address, Instant, SubgraphId},
};

/// Token known to the protocol. ID is the token address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    pub id: SubgraphId,
    pub address: Address,
    pub created_at: Instant,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub is_super_token: bool,
    pub is_listed: bool,
    /// Wrapped token, zero address for native asset and pure super tokens.
    pub underlying_address: Address,
}

impl Token {
    /// Converter of raw amounts of this token.
    pub fn converter(&self) -> Converter { Converter::new(self.decimals) }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenWire {
    id: SubgraphId,
    created_at_block_number: String,
    created_at_timestamp: String,
    decimals: u8,
    name: String,
    symbol: String,
    is_super_token: bool,
    is_listed: bool,
    underlying_address: String,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenFilter {
    pub id: Option<String>,
    pub id_in: Option<Vec<String>>,
    pub id_not: Option<String>,
    pub id_not_in: Option<Vec<String>>,
    pub symbol: Option<String>,
    pub symbol_in: Option<Vec<String>>,
    #[serde(rename = "isSuperToken")]
    pub is_super_token: Option<bool>,
    #[serde(rename = "isListed")]
    pub is_listed: Option<bool>,
    #[serde(rename = "underlyingAddress")]
    pub underlying_address: Option<String>,
    #[serde(rename = "underlyingAddress_in")]
    pub underlying_address_in: Option<Vec<String>>,
    #[serde(rename = "underlyingAddress_not")]
    pub underlying_address_not: Option<String>,
    #[serde(rename = "underlyingAddress_not_in")]
    pub underlying_address_not_in: Option<Vec<String>>,
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
pub enum TokenOrderBy {
    #[default]
    Id,
    CreatedAtBlockNumber,
    CreatedAtTimestamp,
    Name,
    Symbol,
    IsListed,
}

impl OrderField for TokenOrderBy {
    fn field(&self) -> &'static str { (*self).into() }
}

impl Entity for Token {
    const KIND: EntityKind = EntityKind::Token;
    const FIELDS: &'static str = "id createdAtBlockNumber createdAtTimestamp decimals name symbol \
        isSuperToken isListed underlyingAddress";

    type Wire = TokenWire;
    type Filter = TokenFilter;
    type OrderBy = TokenOrderBy;

    fn id(&self) -> &str { &self.id }

    fn normalize(wire: TokenWire) -> Result<Self, NormalizationError> {
        let p = Parser::new(Self::KIND.name());
        Ok(Self {
            address: p.address("id", &wire.id)?,
            created_at: p.instant(
                "createdAtBlockNumber",
                &wire.created_at_block_number,
                "createdAtTimestamp",
                &wire.created_at_timestamp,
            )?,
            decimals: wire.decimals,
            name: wire.name,
            symbol: wire.symbol,
            is_super_token: wire.is_super_token,
            is_listed: wire.is_listed,
            underlying_address: p.address("underlyingAddress", &wire.underlying_address)?,
            id: wire.id,
        })
    }

    fn addresses_from_result(&self) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![self.address.into(), self.underlying_address.into()],
            accounts: vec![],
        }
    }

    fn addresses_from_filter(filter: &TokenFilter) -> RelevantAddressesIntermediate {
        RelevantAddressesIntermediate {
            tokens: vec![
                (&filter.id).into(),
                (&filter.id_in).into(),
                (&filter.id_not).into(),
                (&filter.id_not_in).into(),
                (&filter.underlying_address).into(),
                (&filter.underlying_address_in).into(),
                (&filter.underlying_address_not).into(),
                (&filter.underlying_address_not_in).into(),
            ],
            accounts: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_token_addresses() {
        let wire: TokenWire = serde_json::from_value(json!({
            "id": "0x5d8b4c2554aeb7e86f387b4d6c00ac33499ed01f",
            "createdAtBlockNumber": "5000000",
            "createdAtTimestamp": "1620000000",
            "decimals": 18,
            "name": "Super fDAI Fake Token",
            "symbol": "fDAIx",
            "isSuperToken": true,
            "isListed": true,
            "underlyingAddress": "0x88271d333c72e51516b67f5567c728e702b3eee8",
        }))
        .unwrap();
        let token = Token::normalize(wire).unwrap();
        assert_eq!(token.address, address!("0x5d8b4c2554aeb7e86f387b4d6c00ac33499ed01f"));
        assert_eq!(token.converter().decimals(), 18);

        let addresses = token.addresses_from_result().resolve();
        assert_eq!(
            addresses.tokens,
            vec![
                address!("0x5d8b4c2554aeb7e86f387b4d6c00ac33499ed01f"),
                address!("0x88271d333c72e51516b67f5567c728e702b3eee8"),
            ]
        );
        assert!(addresses.accounts.is_empty());
    }
}
