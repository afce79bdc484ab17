//! AniList connector error types.

use thiserror::Error;
use tracker_auth::AuthError;
use tracker_graphql::{GraphqlClientError, ProtocolError};

/// AniList connector errors.
#[derive(Error, Debug)]
pub enum AniListError {
    /// Request execution failed.
    #[error(transparent)]
    Client(#[from] GraphqlClientError),

    /// No viewer id is cached for the session.
    #[error("You are not authenticated, please log in through the AniList settings")]
    NotAuthenticated,

    /// A title or list entry id was not numeric.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Discover section id is not one of the known sections.
    #[error("Unknown discover section: {0}")]
    UnknownSection(String),

    /// The host called a method the connector does not have.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// A filter value did not have the shape its filter expects.
    #[error("Invalid value for filter {id}: {reason}")]
    InvalidFilter {
        /// Filter id.
        id: String,
        /// What was wrong.
        reason: String,
    },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AuthError> for AniListError {
    fn from(err: AuthError) -> Self {
        Self::Client(GraphqlClientError::Auth(err))
    }
}

impl From<ProtocolError> for AniListError {
    fn from(err: ProtocolError) -> Self {
        Self::Client(GraphqlClientError::Protocol(err))
    }
}

impl From<regex::Error> for AniListError {
    fn from(err: regex::Error) -> Self {
        Self::Config(format!("invalid pattern: {err}"))
    }
}

impl AniListError {
    /// Check whether the remote reported the record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_not_found())
    }

    /// Check whether the user has to log in again to recover.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        match self {
            Self::Client(err) => err.requires_login(),
            Self::NotAuthenticated => true,
            _ => false,
        }
    }

    /// Stable error code reported to the host.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Client(GraphqlClientError::Auth(_)) | Self::NotAuthenticated => "auth",
            Self::Client(GraphqlClientError::Protocol(ProtocolError::TransportFailure(_))) => {
                "transport"
            }
            Self::Client(GraphqlClientError::Protocol(_)) => "protocol",
            Self::Client(GraphqlClientError::Remote(_)) => "remote",
            Self::InvalidId(_)
            | Self::UnknownSection(_)
            | Self::UnknownMethod(_)
            | Self::InvalidFilter { .. } => "invalid_request",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
        }
    }
}

/// Result type for AniList operations.
pub type AniListResult<T> = Result<T, AniListError>;
