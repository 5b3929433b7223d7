use std::marker::PhantomData;

use futures::{Stream, stream};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::{
    GetQuery, ListQuery, OrderDirection, OrderField, OrderKey, PagedResult, Paging,
    RelevantAddresses, RelevantAddressesIntermediate, SubgraphClient, SubgraphRequest,
    paging::ID_FIELD,
};
use crate::{
    entity::EntityKind,
    error::{NormalizationError, SubgraphError},
    types::BlockNumber,
};

/// Entity kind as seen by the generic [`QueryHandler`]: how to request,
/// normalize and extract relevant addresses of it.
pub trait Entity: Sized + Send + Sync {
    const KIND: EntityKind;

    /// GraphQL selection set, nested references selected by `id` only.
    const FIELDS: &'static str;

    /// Raw row of the indexing service response.
    type Wire: DeserializeOwned;

    /// `where` input of list queries.
    type Filter: Serialize + Send + Sync;

    type OrderBy: OrderField + Serialize;

    fn id(&self) -> &str;

    /// Flattens nested references and parses numeric strings, failing on
    /// malformed or partial rows.
    fn normalize(wire: Self::Wire) -> Result<Self, NormalizationError>;

    /// Addresses the entity concerns.
    fn addresses_from_result(&self) -> RelevantAddressesIntermediate;

    /// Addresses the filter could select by, including excluded ones.
    fn addresses_from_filter(filter: &Self::Filter) -> RelevantAddressesIntermediate;
}

/// Stateless get/list engine for an entity kind.
pub struct QueryHandler<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for QueryHandler<E> {
    fn clone(&self) -> Self { *self }
}

impl<E> Copy for QueryHandler<E> {}

impl<E> Default for QueryHandler<E> {
    fn default() -> Self { Self { _entity: PhantomData } }
}

impl<E: Entity> std::fmt::Debug for QueryHandler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "QueryHandler<{}>", E::KIND.name())
    }
}

impl<E: Entity> QueryHandler<E> {
    pub fn new() -> Self { Self::default() }

    /// Fetches a single entity by ID.
    ///
    /// Absent entity is `Ok(None)`, as is an empty ID, which is not sent to
    /// the service at all.
    pub async fn get<C: SubgraphClient>(
        &self,
        client: &C,
        query: &GetQuery,
    ) -> Result<Option<E>, SubgraphError> {
        if query.id.is_empty() {
            return Ok(None);
        }
        let mut filter = Map::new();
        filter.insert(ID_FIELD.to_string(), Value::String(query.id.to_lowercase()));
        let request = self.request(filter, vec![OrderKey::id_asc()], 0, 1, query.block);
        let entity = self.execute(client, &request).await?.into_iter().next();
        if entity.is_none() {
            tracing::debug!(entity = E::KIND.name(), id = %query.id, "entity not found");
        }
        Ok(entity)
    }

    /// Fetches a page of entities.
    ///
    /// One row beyond the page is requested to tell whether there are more
    /// pages, then dropped.
    pub async fn list<C: SubgraphClient>(
        &self,
        client: &C,
        query: &ListQuery<E::Filter, E::OrderBy>,
    ) -> Result<PagedResult<E>, SubgraphError> {
        let mut filter = filter_input::<E>(query.filter.as_ref())?;
        let (skip, order) = match &query.paging {
            Paging::Skip { skip, .. } => (*skip, query.order.unwrap_or_default().keys()),
            Paging::LastId { last_id, .. } => {
                if let Some(last_id) = last_id {
                    filter.insert(format!("{ID_FIELD}_gt"), Value::String(last_id.clone()));
                }
                if query.order.is_some_and(|o| {
                    !o.order_by.is_unique() || o.direction == OrderDirection::Desc
                }) {
                    tracing::debug!(entity = E::KIND.name(), "cursor paging orders by id asc only");
                }
                (0, vec![OrderKey::id_asc()])
            },
        };
        let request = self.request(filter, order, skip, query.paging.take() + 1, query.block);
        let rows = self.execute(client, &request).await?;
        Ok(PagedResult::from_rows(rows, query.paging.clone()))
    }

    /// Stream of all pages starting from the query paging, ending with the
    /// page that has no more results after it.
    pub fn list_all<'a, C: SubgraphClient>(
        &'a self,
        client: &'a C,
        query: ListQuery<E::Filter, E::OrderBy>,
    ) -> impl Stream<Item = Result<PagedResult<E>, SubgraphError>> + 'a
    where
        E: 'a,
        E::Filter: 'a,
        E::OrderBy: 'a,
    {
        stream::try_unfold(Some(query), move |query| async move {
            let Some(query) = query else {
                return Ok(None);
            };
            let page = self.list(client, &query).await?;
            let next = page.next_paging().map(|paging| ListQuery { paging, ..query });
            Ok(Some((page, next)))
        })
    }

    pub fn relevant_addresses_from_result(&self, result: &E) -> RelevantAddresses {
        result.addresses_from_result().resolve()
    }

    /// Absent filter resolves to no addresses.
    pub fn relevant_addresses_from_filter(&self, filter: Option<&E::Filter>) -> RelevantAddresses {
        filter.map(E::addresses_from_filter).unwrap_or_default().resolve()
    }

    fn request(
        &self,
        filter: Map<String, Value>,
        order: Vec<OrderKey>,
        skip: u32,
        first: u32,
        block: Option<BlockNumber>,
    ) -> SubgraphRequest {
        SubgraphRequest {
            entity: E::KIND.name(),
            collection: E::KIND.collection(),
            fields: E::FIELDS,
            filter,
            order,
            skip,
            first,
            block,
        }
    }

    async fn execute<C: SubgraphClient>(
        &self,
        client: &C,
        request: &SubgraphRequest,
    ) -> Result<Vec<E>, SubgraphError> {
        tracing::debug!(
            collection = request.collection,
            skip = request.skip,
            first = request.first,
            block = ?request.block,
            "querying indexing service"
        );
        let mut data = client.execute(request).await?;
        let rows = match data.get_mut(request.collection).map(Value::take) {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(NormalizationError::MissingCollection { collection: request.collection }.into());
            },
        };
        let entities = rows
            .into_iter()
            .map(|row| {
                serde_json::from_value::<E::Wire>(row)
                    .map_err(|source| NormalizationError::Shape { entity: E::KIND.name(), source })
                    .and_then(E::normalize)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entities)
    }
}

fn filter_input<E: Entity>(filter: Option<&E::Filter>) -> Result<Map<String, Value>, SubgraphError> {
    let value = filter
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| SubgraphError::InvalidArgument(e.to_string()))?;
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(SubgraphError::InvalidArgument(format!(
            "{} filter must be an object, got {other}",
            E::KIND.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::entity::{StreamPeriod, StreamPeriodFilter, StreamPeriodOrderBy};
    use crate::query::Order;

    /// Client returning the same data for every request, recording requests.
    struct Canned {
        data: Value,
        requests: Mutex<Vec<SubgraphRequest>>,
    }

    impl Canned {
        fn new(data: Value) -> Self { Self { data, requests: Mutex::new(vec![]) } }

        fn requests(&self) -> Vec<SubgraphRequest> { self.requests.lock().unwrap().clone() }
    }

    impl SubgraphClient for Canned {
        async fn execute(&self, request: &SubgraphRequest) -> Result<Value, SubgraphError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.data.clone())
        }
    }

    fn period_row(id: &str) -> Value {
        json!({
            "id": id,
            "flowRate": "385802469135802",
            "startedAtBlockNumber": "100",
            "startedAtTimestamp": "1650000000",
            "stoppedAtBlockNumber": null,
            "stoppedAtTimestamp": null,
            "totalAmountStreamed": null,
            "token": { "id": "0x00000000000000000000000000000000000000a1" },
            "stream": { "id": "stream-1" },
            "sender": { "id": "0x00000000000000000000000000000000000000b1" },
            "receiver": { "id": "0x00000000000000000000000000000000000000b2" },
            "startedAtEvent": { "id": "event-1" },
            "stoppedAtEvent": null,
        })
    }

    #[tokio::test]
    async fn test_get_lowercases_id_and_takes_one() {
        let client = Canned::new(json!({ "streamPeriods": [period_row("0xabc-0")] }));
        let handler = QueryHandler::<StreamPeriod>::new();

        let period = handler.get(&client, &GetQuery::new("0xABC-0").at_block(7)).await.unwrap();
        assert_eq!(period.unwrap().id, "0xabc-0");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].filter.get("id"), Some(&json!("0xabc-0")));
        assert_eq!(requests[0].first, 1);
        assert_eq!(requests[0].block, Some(7));
    }

    #[tokio::test]
    async fn test_get_not_found_and_empty_id() {
        let client = Canned::new(json!({ "streamPeriods": [] }));
        let handler = QueryHandler::<StreamPeriod>::new();

        assert!(handler.get(&client, &GetQuery::new("missing")).await.unwrap().is_none());
        assert!(handler.get(&client, &GetQuery::new("")).await.unwrap().is_none());
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_list_requests_extra_row() {
        let rows: Vec<_> = (0..3).map(|i| period_row(&format!("p{i}"))).collect();
        let client = Canned::new(json!({ "streamPeriods": rows }));
        let handler = QueryHandler::<StreamPeriod>::new();

        let query = ListQuery::new(Paging::skip(4, 2))
            .with_filter(StreamPeriodFilter {
                sender: Some("0x00000000000000000000000000000000000000b1".to_string()),
                ..Default::default()
            })
            .with_order(Order::desc(StreamPeriodOrderBy::StartedAtTimestamp));
        let page = handler.list(&client, &query).await.unwrap();

        assert_eq!(page.items().len(), 2);
        assert!(page.has_more());
        assert_eq!(page.next_paging(), Some(Paging::Skip { skip: 6, take: 2 }));

        let request = &client.requests()[0];
        assert_eq!(request.first, 3);
        assert_eq!(request.skip, 4);
        assert_eq!(
            request.filter,
            json!({ "sender": "0x00000000000000000000000000000000000000b1" })
                .as_object()
                .unwrap()
                .clone()
        );
        assert_eq!(request.order.len(), 2);
        assert_eq!(request.order[1].field, "id");
    }

    #[tokio::test]
    async fn test_list_cursor_paging() {
        let client = Canned::new(json!({ "streamPeriods": [period_row("p5"), period_row("p6")] }));
        let handler = QueryHandler::<StreamPeriod>::new();

        let query = ListQuery::new(Paging::last_id(Some("p4".to_string()), 1));
        let page = handler.list(&client, &query).await.unwrap();

        assert_eq!(page.next_paging(), Some(Paging::LastId { last_id: Some("p5".to_string()), take: 1 }));
        let request = &client.requests()[0];
        assert_eq!(request.filter.get("id_gt"), Some(&json!("p4")));
        assert_eq!(request.order, vec![OrderKey::id_asc()]);
        assert_eq!(request.skip, 0);
    }

    #[tokio::test]
    async fn test_malformed_response_fails_fast() {
        let mut row = period_row("p0");
        row["flowRate"] = json!("12.5");
        let client = Canned::new(json!({ "streamPeriods": [period_row("ok"), row] }));
        let handler = QueryHandler::<StreamPeriod>::new();
        let err = handler.list(&client, &ListQuery::default()).await.unwrap_err();
        assert!(matches!(
            err,
            SubgraphError::Normalization(NormalizationError::Number { field: "flowRate", .. })
        ));

        let mut row = period_row("p0");
        row.as_object_mut().unwrap().remove("sender");
        let client = Canned::new(json!({ "streamPeriods": [row] }));
        let err = handler.list(&client, &ListQuery::default()).await.unwrap_err();
        assert!(matches!(err, SubgraphError::Normalization(NormalizationError::Shape { .. })));

        let client = Canned::new(json!({ "streams": [] }));
        let err = handler.list(&client, &ListQuery::default()).await.unwrap_err();
        assert!(matches!(
            err,
            SubgraphError::Normalization(NormalizationError::MissingCollection { .. })
        ));
    }

    #[test]
    fn test_absent_filter_has_no_addresses() {
        let handler = QueryHandler::<StreamPeriod>::new();
        assert!(handler.relevant_addresses_from_filter(None).is_empty());
    }
}
