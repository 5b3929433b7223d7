use super::{CacheTag, CacheTagKind, provide_tags, query_key};
use crate::{
    entity::EntityKind,
    error::SubgraphError,
    query::{Entity, GetQuery, ListQuery, PagedResult, QueryHandler, SubgraphClient},
};

impl EntityKind {
    /// Tag kind of cached get results of this kind.
    pub const fn get_tag_kind(self) -> CacheTagKind {
        match self {
            EntityKind::Account
            | EntityKind::AccountTokenSnapshot
            | EntityKind::IndexUpdatedEvent
            | EntityKind::SubscriptionUnitsUpdatedEvent => CacheTagKind::Event,
            EntityKind::Token | EntityKind::TokenStatistic => CacheTagKind::Token,
            EntityKind::Stream | EntityKind::StreamPeriod => CacheTagKind::Stream,
            EntityKind::Index | EntityKind::IndexSubscription => CacheTagKind::Index,
        }
    }

    /// Tag kind of cached list results of this kind.
    ///
    /// Same as [`Self::get_tag_kind`] except for account token snapshots,
    /// lists of which are invalidated along with tokens.
    pub const fn list_tag_kind(self) -> CacheTagKind {
        match self {
            EntityKind::AccountTokenSnapshot => CacheTagKind::Token,
            other => other.get_tag_kind(),
        }
    }
}

/// Query result along with the cache tags to store it under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tagged<T> {
    pub data: T,
    pub tags: Vec<CacheTag>,
}

/// Cached get/list endpoint of an entity kind: the query handler plus the
/// tag kinds its results are tagged with.
///
/// Get results are tagged by the addresses of the entity, list results by
/// the addresses of the filter, so a list can be invalidated by an entity it
/// does not contain yet.
pub struct Endpoint<E> {
    handler: QueryHandler<E>,
}

impl<E> Clone for Endpoint<E> {
    fn clone(&self) -> Self { *self }
}

impl<E> Copy for Endpoint<E> {}

impl<E> Default for Endpoint<E> {
    fn default() -> Self { Self { handler: QueryHandler::default() } }
}

impl<E: Entity> std::fmt::Debug for Endpoint<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Endpoint<{}>", E::KIND.name())
    }
}

impl<E: Entity> Endpoint<E> {
    pub fn new() -> Self { Self::default() }

    pub fn handler(&self) -> QueryHandler<E> { self.handler }

    pub fn get_tag_kind(&self) -> CacheTagKind { E::KIND.get_tag_kind() }

    pub fn list_tag_kind(&self) -> CacheTagKind { E::KIND.list_tag_kind() }

    pub async fn get<C: SubgraphClient>(
        &self,
        client: &C,
        chain_id: u64,
        query: &GetQuery,
    ) -> Result<Tagged<Option<E>>, SubgraphError> {
        let data = self.handler.get(client, query).await?;
        let tags = self.get_tags(chain_id, data.as_ref());
        Ok(Tagged { data, tags })
    }

    pub async fn list<C: SubgraphClient>(
        &self,
        client: &C,
        chain_id: u64,
        query: &ListQuery<E::Filter, E::OrderBy>,
    ) -> Result<Tagged<PagedResult<E>>, SubgraphError> {
        let data = self.handler.list(client, query).await?;
        let tags = self.list_tags(chain_id, query.filter.as_ref());
        Ok(Tagged { data, tags })
    }

    /// Tags of a get result, none for an absent entity.
    pub fn get_tags(&self, chain_id: u64, result: Option<&E>) -> Vec<CacheTag> {
        match result {
            Some(entity) => provide_tags(
                chain_id,
                &self.handler.relevant_addresses_from_result(entity),
                self.get_tag_kind(),
            ),
            None => vec![],
        }
    }

    /// Tags of a list result, known before the query is executed.
    pub fn list_tags(&self, chain_id: u64, filter: Option<&E::Filter>) -> Vec<CacheTag> {
        provide_tags(
            chain_id,
            &self.handler.relevant_addresses_from_filter(filter),
            self.list_tag_kind(),
        )
    }

    /// Cache key of a get query, e.g. `stream-period(137,{...})`.
    pub fn get_key(&self, chain_id: u64, query: &GetQuery) -> Result<String, SubgraphError> {
        query_key(chain_id, &E::KIND.to_string(), query)
    }

    /// Cache key of a list query, e.g. `streamPeriods(137,{...})`.
    pub fn list_key(
        &self,
        chain_id: u64,
        query: &ListQuery<E::Filter, E::OrderBy>,
    ) -> Result<String, SubgraphError> {
        query_key(chain_id, E::KIND.collection(), query)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(EntityKind::Account, CacheTagKind::Event, CacheTagKind::Event)]
    #[case(EntityKind::AccountTokenSnapshot, CacheTagKind::Event, CacheTagKind::Token)]
    #[case(EntityKind::Index, CacheTagKind::Index, CacheTagKind::Index)]
    #[case(EntityKind::IndexSubscription, CacheTagKind::Index, CacheTagKind::Index)]
    #[case(EntityKind::Stream, CacheTagKind::Stream, CacheTagKind::Stream)]
    #[case(EntityKind::StreamPeriod, CacheTagKind::Stream, CacheTagKind::Stream)]
    #[case(EntityKind::Token, CacheTagKind::Token, CacheTagKind::Token)]
    #[case(EntityKind::TokenStatistic, CacheTagKind::Token, CacheTagKind::Token)]
    #[case(EntityKind::IndexUpdatedEvent, CacheTagKind::Event, CacheTagKind::Event)]
    #[case(EntityKind::SubscriptionUnitsUpdatedEvent, CacheTagKind::Event, CacheTagKind::Event)]
    fn test_tag_kinds(
        #[case] kind: EntityKind,
        #[case] get: CacheTagKind,
        #[case] list: CacheTagKind,
    ) {
        assert_eq!(kind.get_tag_kind(), get);
        assert_eq!(kind.list_tag_kind(), list);
    }
}
