//! Authentication error types.

use chrono::{DateTime, Utc};

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No usable token is stored.
    #[error("You are not authenticated, please log in through the settings")]
    NotAuthenticated,

    /// Token does not have the three-segment structure.
    #[error("Invalid authentication token, please log in again through the settings")]
    Malformed,

    /// The claims segment could not be decoded or parsed.
    #[error("Invalid authentication token claims ({0}), please log in again through the settings")]
    UndecodableClaims(String),

    /// Token expiry is in the past.
    #[error(
        "Your authorization token expired at {expired_at}, please log back in through the settings"
    )]
    Expired {
        /// When the token expired.
        expired_at: DateTime<Utc>,
    },

    /// Invalid client configuration.
    #[error("Invalid OAuth configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing failed.
    #[error("URL parsing failed: {0}")]
    UrlError(#[from] url::ParseError),
}

impl AuthError {
    /// Returns `true` if the user has to sign in again to recover.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::Malformed | Self::UndecodableClaims(_) | Self::Expired { .. }
        )
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
