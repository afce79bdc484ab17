//! Operation types and typed GraphQL traits.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GraphqlError;

/// GraphQL query document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphqlQuery {
    query: String,
}

impl GraphqlQuery {
    /// Create a new query from a string.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Create a new query from a static string.
    #[must_use]
    pub fn from_static(query: &'static str) -> Self {
        Self::new(query)
    }

    /// Return the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.query
    }
}

/// Typed GraphQL operation definition.
///
/// Implement this trait for each fixed query or mutation the connector sends.
pub trait GraphqlOperation {
    /// Variables type.
    type Variables: Serialize + Send + Sync;
    /// Response data type.
    type ResponseData: DeserializeOwned + Send;

    /// GraphQL document text.
    const QUERY: &'static str;
    /// Operation name (used for observability).
    const OPERATION_NAME: &'static str;

    /// Whether the operation must carry the bearer session.
    fn requires_auth() -> bool {
        false
    }
}

/// GraphQL request body: `{query, variables}`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<V> {
    /// Query text.
    pub query: GraphqlQuery,
    /// Variables.
    pub variables: V,
}

impl<V> GraphqlRequest<V> {
    /// Create a new request.
    #[must_use]
    pub const fn new(query: GraphqlQuery, variables: V) -> Self {
        Self { query, variables }
    }
}

/// GraphQL response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

impl<T> GraphqlResponse<T> {
    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.as_ref().is_none_or(Vec::is_empty)
    }
}
