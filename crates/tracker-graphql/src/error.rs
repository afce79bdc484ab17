//! Error types for the GraphQL client.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracker_auth::AuthError;
use tracker_ratelimit::RateLimitError;

/// Transport failure information captured from the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl TransportError {
    /// Create a transport error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            is_timeout: false,
            is_connect: false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

impl From<RateLimitError> for TransportError {
    fn from(err: RateLimitError) -> Self {
        Self::new(format!("rate limiter refused request: {err}"))
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query (1-based).
    pub line: u32,
    /// Column number in the query (1-based).
    pub column: u32,
}

/// GraphQL error as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// HTTP-style status code the service attaches to the error.
    #[serde(default)]
    pub status: Option<u16>,
    /// Location(s) within the query.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Per-field validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphqlErrorLocation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GraphqlErrorLocation>>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphqlError {
    /// Render as `[<status>] <message>`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.status {
            Some(status) => format!("[{status}] {}", self.message),
            None => format!("[unknown] {}", self.message),
        }
    }
}

/// Errors the remote service reported for a request.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.messages())]
pub struct RemoteError {
    /// Errors in the order the service returned them.
    pub errors: Vec<GraphqlError>,
}

impl RemoteError {
    /// All errors as `[<status>] <message>` lines.
    #[must_use]
    pub fn messages(&self) -> String {
        self.errors
            .iter()
            .map(GraphqlError::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns `true` if any error carries a 404 status.
    ///
    /// Callers use this to tell "no such record yet" apart from real failures.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.errors.iter().any(|err| err.status == Some(404))
    }
}

/// Failures in the request/response exchange itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The response was not a GraphQL envelope.
    #[error("Failed to parse response: {0}")]
    Unparseable(String),

    /// The envelope carried no errors and no data.
    #[error("Response contained no data")]
    EmptyPayload,

    /// A list query returned no page container.
    #[error("Returned an empty result set")]
    EmptyResultSet,

    /// The transport could not deliver the request.
    #[error("Transport failure: {0}")]
    TransportFailure(TransportError),
}

/// Error type for GraphQL client operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphqlClientError {
    /// Session missing, malformed, or expired.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request/response exchange failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The remote service reported errors.
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

impl From<TransportError> for GraphqlClientError {
    fn from(err: TransportError) -> Self {
        Self::Protocol(ProtocolError::TransportFailure(err))
    }
}

impl From<serde_json::Error> for GraphqlClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(ProtocolError::Unparseable(err.to_string()))
    }
}

impl GraphqlClientError {
    /// Returns `true` if the remote service reported a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote(remote) if remote.is_not_found())
    }

    /// Returns `true` if the user has to sign in again to recover.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Auth(err) if err.requires_login())
    }
}
