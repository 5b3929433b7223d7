use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::SubgraphError, query::RelevantAddresses, types::Address};

/// Category of cache tags, invalidated separately from each other.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum CacheTagKind {
    /// Accounts and protocol events.
    Event,
    Index,
    Stream,
    Token,
}

/// What a [`CacheTag`] is scoped to within its chain and kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagScope {
    /// Any change of the kind on the chain.
    General,
    Address(Address),
}

/// Cache invalidation tag, scoped per chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheTag {
    chain_id: u64,
    kind: CacheTagKind,
    scope: TagScope,
}

impl CacheTag {
    pub fn general(chain_id: u64, kind: CacheTagKind) -> Self {
        Self { chain_id, kind, scope: TagScope::General }
    }

    pub fn address(chain_id: u64, kind: CacheTagKind, address: Address) -> Self {
        Self { chain_id, kind, scope: TagScope::Address(address) }
    }

    pub fn chain_id(&self) -> u64 { self.chain_id }

    pub fn kind(&self) -> CacheTagKind { self.kind }

    pub fn scope(&self) -> TagScope { self.scope }

    pub fn is_general(&self) -> bool { self.scope == TagScope::General }
}

/// `Stream:137` or `Stream:137_0xabc...`, addresses in lower case.
impl Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope {
            TagScope::General => write!(f, "{}:{}", self.kind, self.chain_id),
            TagScope::Address(address) => write!(f, "{}:{}_{:#x}", self.kind, self.chain_id, address),
        }
    }
}

#[cfg(feature = "display")]
impl tabled::Tabled for CacheTag {
    const LENGTH: usize = 3;

    fn fields(&self) -> Vec<std::borrow::Cow<'_, str>> {
        use colored::Colorize;

        vec![
            self.chain_id.to_string().into(),
            self.kind.to_string().blue().to_string().into(),
            match self.scope {
                TagScope::General => "general".dimmed().to_string().into(),
                TagScope::Address(address) => format!("{address:#x}").into(),
            },
        ]
    }

    fn headers() -> Vec<std::borrow::Cow<'static, str>> {
        vec!["Chain".into(), "Kind".into(), "Scope".into()]
    }
}

/// Tags of a cached query result: one per relevant address, tokens first,
/// then the general tag of the kind.
///
/// The general tag is always present, so results of unconstrained queries
/// are still invalidated by any change of the kind on the chain.
pub fn provide_tags(chain_id: u64, addresses: &RelevantAddresses, kind: CacheTagKind) -> Vec<CacheTag> {
    addresses
        .all()
        .map(|address| CacheTag::address(chain_id, kind, address))
        .chain(std::iter::once(CacheTag::general(chain_id, kind)))
        .unique()
        .collect()
}

/// Address-scoped tags to invalidate on an observed on-chain change touching
/// the given addresses.
///
/// General tags are not included, add [`CacheTag::general`] for kind-wide
/// invalidation, e.g. when a new entity appears.
pub fn invalidation_tags(
    chain_id: u64,
    addresses: impl IntoIterator<Item = Address>,
    kinds: &[CacheTagKind],
) -> Vec<CacheTag> {
    let addresses: Vec<_> = addresses.into_iter().unique().collect();
    kinds
        .iter()
        .unique()
        .flat_map(|kind| addresses.iter().map(|address| CacheTag::address(chain_id, *kind, *address)))
        .collect()
}

/// Cache key of a query: endpoint name, chain and arguments serialized with
/// sorted object keys, so equal arguments always produce the same key.
pub fn query_key(chain_id: u64, endpoint: &str, args: &impl Serialize) -> Result<String, SubgraphError> {
    let args = serde_json::to_value(args).map_err(|e| SubgraphError::InvalidArgument(e.to_string()))?;
    Ok(format!("{endpoint}({chain_id},{})", canonical(args)))
}

fn canonical(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .sorted_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(k, v)| (k, canonical(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(canonical).collect()),
        other => other,
    }
}
