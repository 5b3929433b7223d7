use std::time::Duration;

use flowgraph_sdk::{
    error::SubgraphError,
    query::{SubgraphClient, SubgraphRequest, response_data},
};
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GraphQL-over-HTTP client of the indexing service.
#[derive(Clone, Debug)]
pub(crate) struct HttpSubgraphClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubgraphClient {
    pub(crate) fn new(endpoint: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, endpoint: endpoint.to_string() })
    }
}

impl SubgraphClient for HttpSubgraphClient {
    async fn execute(&self, request: &SubgraphRequest) -> Result<Value, SubgraphError> {
        let body = self
            .client
            .post(&self.endpoint)
            .json(&request.to_graphql())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(SubgraphError::transport)?
            .bytes()
            .await
            .map_err(SubgraphError::transport)?;
        tracing::trace!(endpoint = %self.endpoint, bytes = body.len(), "indexing service responded");
        response_data(&body)
    }
}
