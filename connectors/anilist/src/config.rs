//! AniList connector configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracker_ratelimit::RateLimitConfig;

/// Configuration for the AniList connector.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AniListConfig {
    /// GraphQL endpoint.
    pub endpoint: String,

    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Outbound request pacing.
    pub rate_limit: RateLimitSettings,

    /// OAuth client id used for the implicit grant.
    pub client_id: String,

    /// OAuth authorize endpoint.
    pub authorize_url: String,

    /// How long cached genre and tag lists stay fresh.
    #[serde(with = "duration_secs")]
    pub filter_cache_ttl: Duration,

    /// Prefix of public title pages.
    pub share_url_base: String,
}

impl Default for AniListConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://graphql.anilist.co".into(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("anilist-connector/", env!("CARGO_PKG_VERSION")).into(),
            rate_limit: RateLimitSettings::default(),
            client_id: "6621".into(),
            authorize_url: "https://anilist.co/api/v2/oauth/authorize".into(),
            filter_cache_ttl: Duration::from_secs(604_800),
            share_url_base: "https://anilist.co/manga/".into(),
        }
    }
}

/// Rate limit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Requests admitted per interval.
    pub requests: u32,

    /// Interval length
    #[serde(with = "duration_secs")]
    pub interval: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        let host = RateLimitConfig::host_default();
        Self {
            requests: host.requests_per_window,
            interval: host.window,
        }
    }
}

impl From<RateLimitSettings> for RateLimitConfig {
    fn from(settings: RateLimitSettings) -> Self {
        Self::new(settings.requests, settings.interval)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
