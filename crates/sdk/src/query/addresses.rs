use itertools::Itertools;

use crate::types::Address;

/// Address contributed by a single result field or filter operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressCandidate {
    Absent,
    /// Typed address of a normalized entity.
    Known(Address),
    /// Address as given in a filter, parsed on resolution.
    Raw(String),
    /// Addresses of `_in`/`_not_in` operators.
    List(Vec<String>),
}

impl From<Address> for AddressCandidate {
    fn from(value: Address) -> Self { Self::Known(value) }
}

impl From<&str> for AddressCandidate {
    fn from(value: &str) -> Self { Self::Raw(value.to_string()) }
}

impl From<&String> for AddressCandidate {
    fn from(value: &String) -> Self { Self::Raw(value.clone()) }
}

impl From<&Option<String>> for AddressCandidate {
    fn from(value: &Option<String>) -> Self {
        value.as_ref().map_or(Self::Absent, |v| Self::Raw(v.clone()))
    }
}

impl From<&Option<Vec<String>>> for AddressCandidate {
    fn from(value: &Option<Vec<String>>) -> Self {
        value.as_ref().map_or(Self::Absent, |v| Self::List(v.clone()))
    }
}

/// Token and account candidates as extracted by an [`super::Entity`], before
/// resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelevantAddressesIntermediate {
    pub tokens: Vec<AddressCandidate>,
    pub accounts: Vec<AddressCandidate>,
}

impl RelevantAddressesIntermediate {
    /// Flattens candidates of both buckets into deduplicated addresses,
    /// preserving the first-seen order.
    ///
    /// Absent candidates and values that are not addresses contribute
    /// nothing, so a malformed filter falls back to the general cache tag
    /// instead of failing.
    pub fn resolve(self) -> RelevantAddresses {
        RelevantAddresses { tokens: resolve_bucket(self.tokens), accounts: resolve_bucket(self.accounts) }
    }
}

fn resolve_bucket(candidates: Vec<AddressCandidate>) -> Vec<Address> {
    candidates
        .into_iter()
        .flat_map(|candidate| match candidate {
            AddressCandidate::Absent => vec![],
            AddressCandidate::Known(address) => vec![Some(address)],
            AddressCandidate::Raw(raw) => vec![parse(&raw)],
            AddressCandidate::List(list) => list.iter().map(|raw| parse(raw)).collect(),
        })
        .flatten()
        .unique()
        .collect()
}

fn parse(raw: &str) -> Option<Address> {
    let address = raw.trim().parse::<Address>().ok();
    if address.is_none() {
        tracing::trace!(value = raw, "ignoring non-address filter value");
    }
    address
}

/// Token and account addresses a query result or filter depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelevantAddresses {
    pub tokens: Vec<Address>,
    pub accounts: Vec<Address>,
}

impl RelevantAddresses {
    pub fn is_empty(&self) -> bool { self.tokens.is_empty() && self.accounts.is_empty() }

    /// Tokens followed by accounts, without repeats.
    pub fn all(&self) -> impl Iterator<Item = Address> + '_ {
        self.tokens.iter().chain(self.accounts.iter()).copied().unique()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    const A: Address = address!("0x00000000000000000000000000000000000000aa");
    const B: Address = address!("0x00000000000000000000000000000000000000bb");

    #[test]
    fn test_resolve_flattens_and_dedups() {
        let intermediate = RelevantAddressesIntermediate {
            tokens: vec![AddressCandidate::Absent, AddressCandidate::Known(A)],
            accounts: vec![
                AddressCandidate::Raw("0x00000000000000000000000000000000000000BB".to_string()),
                AddressCandidate::List(vec![
                    "0x00000000000000000000000000000000000000bb".to_string(),
                    "0x00000000000000000000000000000000000000aa".to_string(),
                ]),
                AddressCandidate::Absent,
            ],
        };
        let resolved = intermediate.resolve();
        assert_eq!(resolved.tokens, vec![A]);
        assert_eq!(resolved.accounts, vec![B, A]);
        assert_eq!(resolved.all().collect::<Vec<_>>(), vec![A, B]);
    }

    #[test]
    fn test_resolve_ignores_malformed_values() {
        let intermediate = RelevantAddressesIntermediate {
            tokens: vec![AddressCandidate::Raw("DAIx".to_string())],
            accounts: vec![AddressCandidate::List(vec!["".to_string(), "0x12".to_string()])],
        };
        let resolved = intermediate.resolve();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_candidate_from_filter_values() {
        assert_eq!(AddressCandidate::from(&None::<String>), AddressCandidate::Absent);
        assert_eq!(AddressCandidate::from(&None::<Vec<String>>), AddressCandidate::Absent);
        assert_eq!(
            AddressCandidate::from(&Some(vec!["0x1".to_string()])),
            AddressCandidate::List(vec!["0x1".to_string()])
        );
    }
}
