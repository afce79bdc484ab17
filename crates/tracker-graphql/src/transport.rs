//! Transport scheduler interface and the default HTTP implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;
use tracing::{debug, warn};
use tracker_ratelimit::{RateLimitConfig, RateLimiter};

use crate::error::TransportError;

/// Outbound request handed to the transport scheduler.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Target URL.
    pub url: String,
    /// HTTP method.
    pub method: Method,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Vec<u8>,
}

/// Host transport scheduler.
///
/// Implementations may pace, intercept, or reroute requests; they hand back
/// the raw response body. A submitted request runs to completion or failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response bytes.
    async fn submit(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError>;
}

/// Default transport: reqwest behind a rate limiter.
pub struct HttpTransport {
    http: reqwest::Client,
    limiter: Arc<dyn RateLimiter>,
    max_wait: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("limiter", &self.limiter.state())
            .field("max_wait", &self.max_wait)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport with the given timeout, user agent and pacing.
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        rate_limit: RateLimitConfig,
    ) -> Result<Self, TransportError> {
        rate_limit
            .validate()
            .map_err(|err| TransportError::new(err.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            limiter: Arc::new(rate_limit.build()),
            max_wait: Duration::from_secs(60),
        })
    }

    /// Replace the rate limiter.
    #[must_use]
    pub fn with_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Set the longest time a request may wait for a permit.
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError> {
        let waited = self.limiter.acquire(self.max_wait).await?;
        if !waited.is_zero() {
            debug!(waited_ms = waited.as_millis(), "request paced by rate limiter");
        }

        let response = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        // Error statuses still carry a GraphQL envelope; the executor reads it.
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body = %truncate_body(&bytes),
                "non-success HTTP status from remote"
            );
        }

        Ok(bytes.to_vec())
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 512;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
