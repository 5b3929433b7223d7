use thiserror::Error;

/// Error of a single get/list call.
#[derive(Debug, Error)]
pub enum SubgraphError {
    /// Indexing service could not be reached, passed through from the client
    /// as is.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Indexing service responded with GraphQL errors.
    #[error("indexing service error: {0}")]
    Response(String),

    /// Response could not be turned into entities.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SubgraphError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Malformed or partial response of the indexing service.
#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("response has no `{collection}` collection")]
    MissingCollection { collection: &'static str },

    #[error("malformed {entity} row: {source}")]
    Shape {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity}.{field}: expected integer, got {value:?}")]
    Number { entity: &'static str, field: &'static str, value: String },

    #[error("{entity}.{field}: expected address, got {value:?}")]
    Address { entity: &'static str, field: &'static str, value: String },
}
