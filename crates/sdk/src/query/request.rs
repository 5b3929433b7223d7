use std::future::Future;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::OrderKey;
use crate::{
    error::{NormalizationError, SubgraphError},
    types::BlockNumber,
};

/// Typed list request to the indexing service.
///
/// Get requests are list requests constrained by ID.
#[derive(Clone, Debug, PartialEq)]
pub struct SubgraphRequest {
    /// Entity type name, e.g. `StreamPeriod`.
    pub entity: &'static str,
    /// Collection to query, e.g. `streamPeriods`.
    pub collection: &'static str,
    /// GraphQL selection set of the entity.
    pub fields: &'static str,
    /// `where` input.
    pub filter: Map<String, Value>,
    /// Sort keys, the last one always being the entity ID.
    pub order: Vec<OrderKey>,
    pub skip: u32,
    pub first: u32,
    pub block: Option<BlockNumber>,
}

impl SubgraphRequest {
    /// GraphQL query document.
    pub fn document(&self) -> String {
        let entity = self.entity;
        let collection = self.collection;
        let fields = self.fields;
        format!(
            "query {entity}List($first: Int!, $skip: Int!, $orderBy: {entity}_orderBy!, \
             $orderDirection: OrderDirection!, $where: {entity}_filter!, $block: Block_height) {{\n  \
             {collection}(first: $first, skip: $skip, orderBy: $orderBy, \
             orderDirection: $orderDirection, where: $where, block: $block) {{ {fields} }}\n}}"
        )
    }

    /// Variables of the [`Self::document`].
    ///
    /// The service accepts a single sort key, the primary one is sent and the
    /// ID tie-break is applied by the service itself.
    pub fn variables(&self) -> Value {
        let primary = self.order.first().copied().unwrap_or(OrderKey::id_asc());
        json!({
            "first": self.first,
            "skip": self.skip,
            "orderBy": primary.field,
            "orderDirection": primary.direction.as_str(),
            "where": self.filter,
            "block": self.block.map(|number| json!({ "number": number })),
        })
    }

    /// Body of the GraphQL-over-HTTP request.
    pub fn to_graphql(&self) -> Value { json!({ "query": self.document(), "variables": self.variables() }) }
}

/// Client executing requests against the indexing service.
///
/// Transport, retries and timeouts are up to the implementation. The SDK
/// propagates its errors unchanged.
pub trait SubgraphClient: Sync {
    /// Executes the request, returning the GraphQL `data` object with the
    /// requested collection in it.
    fn execute(
        &self,
        request: &SubgraphRequest,
    ) -> impl Future<Output = Result<Value, SubgraphError>> + Send;
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Extracts `data` out of the raw GraphQL response body.
pub fn response_data(body: &[u8]) -> Result<Value, SubgraphError> {
    let response: GraphQlResponse = serde_json::from_slice(body)
        .map_err(|source| NormalizationError::Shape { entity: "GraphQL response", source })?;
    if !response.errors.is_empty() {
        return Err(SubgraphError::Response(
            response.errors.into_iter().map(|e| e.message).collect::<Vec<_>>().join("; "),
        ));
    }
    response.data.ok_or_else(|| SubgraphError::Response("response has no data".to_string()))
}
