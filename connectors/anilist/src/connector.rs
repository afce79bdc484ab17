//! AniList connector: the service behind every capability.

use std::sync::Arc;

use tracing::info;
use tracker_auth::{Clock, MemorySessionStore, SessionStore, SystemClock};
use tracker_graphql::{
    GraphqlClient, GraphqlClientError, GraphqlClientMetricsSnapshot, HttpTransport, Transport,
};

use crate::aggregator::PageAggregator;
use crate::config::AniListConfig;
use crate::error::{AniListError, AniListResult};

/// Session key of the cached viewer id.
pub const VIEWER_ID_KEY: &str = "viewer-id";

/// AniList connector.
///
/// Implements the discovery, search, detail, progress and settings
/// capabilities over one GraphQL client. The session store and clock are
/// injected so hosts and tests control shared state.
#[derive(Debug, Clone)]
pub struct AniListConnector {
    config: AniListConfig,
    client: GraphqlClient,
}

impl AniListConnector {
    /// Create a connector with the HTTP transport, an in-memory store and the
    /// system clock.
    pub fn new(config: AniListConfig) -> AniListResult<Self> {
        let transport = HttpTransport::new(
            config.timeout,
            &config.user_agent,
            config.rate_limit.into(),
        )
        .map_err(GraphqlClientError::from)?;

        Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(MemorySessionStore::new()),
            Arc::new(SystemClock),
        )
    }

    /// Create a connector from host-provided parts.
    pub fn with_parts(
        config: AniListConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> AniListResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AniListError::Config("endpoint must not be empty".into()));
        }

        let client = GraphqlClient::builder(config.endpoint.clone())
            .with_service_name("anilist")
            .with_transport(transport)
            .with_store(store)
            .with_clock(clock)
            .build()?;

        info!(endpoint = %config.endpoint, "AniList connector ready");
        Ok(Self { config, client })
    }

    /// Connector configuration.
    #[must_use]
    pub const fn config(&self) -> &AniListConfig {
        &self.config
    }

    /// Underlying GraphQL client.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Host session store.
    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.client.store().as_ref()
    }

    /// Request counters.
    #[must_use]
    pub fn metrics(&self) -> GraphqlClientMetricsSnapshot {
        self.client.metrics()
    }

    /// Cached id of the logged in viewer.
    #[must_use]
    pub fn viewer_id(&self) -> Option<u64> {
        self.store()
            .get(VIEWER_ID_KEY)
            .and_then(|id| id.trim().parse().ok())
    }

    /// List page fetcher over this connector's client.
    #[must_use]
    pub const fn pages(&self) -> PageAggregator<'_> {
        PageAggregator::new(&self.client)
    }
}

/// Parse a numeric AniList id.
pub(crate) fn parse_id(id: &str) -> AniListResult<u64> {
    id.trim()
        .parse()
        .map_err(|_| AniListError::InvalidId(id.to_string()))
}
