//! OAuth 2.0 implicit grant.
//!
//! The host opens the authorize URL in a browser and hands the returned access
//! token back to the connector, which stores it as the session.

use url::Url;

use crate::{AuthError, AuthResult};

/// Implicit grant configuration for a public client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitGrant {
    /// Client ID.
    pub client_id: String,
    /// Authorization endpoint URL.
    pub authorization_url: String,
}

impl ImplicitGrant {
    /// Create a new implicit grant configuration.
    #[must_use]
    pub fn new(client_id: impl Into<String>, authorization_url: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authorization_url: authorization_url.into(),
        }
    }

    /// Build the authorization URL requesting a token response.
    pub fn authorization_url(&self) -> AuthResult<String> {
        if self.client_id.is_empty() {
            return Err(AuthError::InvalidConfig("client_id is required".into()));
        }

        let mut url = Url::parse(&self.authorization_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "token");

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let grant = ImplicitGrant::new("6621", "https://anilist.co/api/v2/oauth/authorize");
        assert_eq!(
            grant.authorization_url().unwrap(),
            "https://anilist.co/api/v2/oauth/authorize?client_id=6621&response_type=token"
        );
    }

    #[test]
    fn test_authorization_url_rejects_bad_config() {
        let grant = ImplicitGrant::new("", "https://example.com/authorize");
        assert!(matches!(
            grant.authorization_url(),
            Err(AuthError::InvalidConfig(_))
        ));

        let grant = ImplicitGrant::new("1", "not a url");
        assert!(matches!(grant.authorization_url(), Err(AuthError::UrlError(_))));
    }
}
