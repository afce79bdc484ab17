//! GraphQL request executor.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use tracker_auth::{
    AuthError, BearerToken, Clock, MemorySessionStore, Session, SessionStore, SystemClock,
    TokenInspector,
};
use tracker_ratelimit::RateLimitConfig;

use crate::error::{GraphqlClientError, ProtocolError, RemoteError};
use crate::operation::{GraphqlOperation, GraphqlQuery, GraphqlRequest, GraphqlResponse};
use crate::transport::{HttpTransport, Transport, TransportRequest};

/// GraphQL client metrics.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct GraphqlClientMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
}

impl GraphqlClientMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> GraphqlClientMetricsSnapshot {
        GraphqlClientMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct GraphqlClientMetricsSnapshot {
    /// Total requests.
    pub requests_total: u64,
    /// Requests that returned data.
    pub requests_success: u64,
    /// Requests that failed for any reason.
    pub requests_error: u64,
}

/// GraphQL client configuration.
#[derive(Debug, Clone)]
pub struct GraphqlClientConfig {
    /// Service name used in logs.
    pub service_name: String,
    /// Headers applied to every request.
    pub headers: HeaderMap,
}

impl Default for GraphqlClientConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            service_name: "graphql".to_string(),
            headers,
        }
    }
}

/// GraphQL client builder.
pub struct GraphqlClientBuilder {
    endpoint: String,
    config: GraphqlClientConfig,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn SessionStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl std::fmt::Debug for GraphqlClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GraphqlClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: GraphqlClientConfig::default(),
            transport: None,
            store: None,
            clock: None,
        }
    }

    /// Set the service name used in logs.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.config.service_name = service_name.into();
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Use a host transport scheduler instead of the default HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a host session store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a host clock for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GraphqlClient, GraphqlClientError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                Duration::from_secs(30),
                &self.config.service_name,
                RateLimitConfig::host_default(),
            )?),
        };

        Ok(GraphqlClient {
            endpoint: self.endpoint,
            config: self.config,
            transport,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            metrics: Arc::new(GraphqlClientMetrics::default()),
        })
    }
}

/// GraphQL client for a single fixed endpoint.
///
/// Each call performs one transport hand-off and never retries; a fresh call
/// is the caller's only recourse after a failure.
#[derive(Clone)]
pub struct GraphqlClient {
    endpoint: String,
    config: GraphqlClientConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    metrics: Arc<GraphqlClientMetrics>,
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .field("service_name", &self.config.service_name)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

impl GraphqlClient {
    /// Start building a client for `endpoint`.
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> GraphqlClientBuilder {
        GraphqlClientBuilder::new(endpoint)
    }

    /// Endpoint every request is posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Session store the client reads the bearer token from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Clock used for expiry checks.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Return client metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> GraphqlClientMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Execute a typed operation with its default auth requirement.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: &O::Variables,
    ) -> Result<O::ResponseData, GraphqlClientError> {
        self.execute_with_auth::<O>(variables, O::requires_auth())
            .await
    }

    /// Execute a typed operation, overriding whether it carries the session.
    pub async fn execute_with_auth<O: GraphqlOperation>(
        &self,
        variables: &O::Variables,
        needs_auth: bool,
    ) -> Result<O::ResponseData, GraphqlClientError> {
        debug!(operation = O::OPERATION_NAME, "executing operation");
        let request = GraphqlRequest::new(GraphqlQuery::from_static(O::QUERY), variables);
        self.execute_request(&request, needs_auth).await
    }

    /// Execute an arbitrary request and return its data payload.
    #[instrument(skip_all, fields(service = %self.config.service_name, needs_auth = needs_auth))]
    pub async fn execute_request<V, R>(
        &self,
        request: &GraphqlRequest<V>,
        needs_auth: bool,
    ) -> Result<R, GraphqlClientError>
    where
        V: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);

        let result = self.send(request, needs_auth).await;
        match &result {
            Ok(_) => {
                self.metrics
                    .requests_success
                    .fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                debug!(error = %err, "request failed");
            }
        }
        result
    }

    /// Read and check the stored session token.
    ///
    /// An expired token clears the session and every derived viewer field
    /// before the error is returned.
    pub fn authorize(&self) -> Result<BearerToken, AuthError> {
        let token = Session::read_token(self.store.as_ref())?;
        let now = self.clock.now();
        match TokenInspector::inspect(token.as_str(), now) {
            Ok(claims) => {
                debug!(
                    subject = ?claims.subject,
                    expires_in_secs = claims.time_until_expiry(now).map(|left| left.as_secs()),
                    "session token accepted"
                );
                Ok(token)
            }
            Err(err @ AuthError::Expired { .. }) => {
                warn!(error = %err, "session token expired; clearing session");
                Session::clear(self.store.as_ref());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn send<V, R>(
        &self,
        request: &GraphqlRequest<V>,
        needs_auth: bool,
    ) -> Result<R, GraphqlClientError>
    where
        V: Serialize + Sync,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(request)?;
        let mut headers = self.config.headers.clone();

        if needs_auth {
            let token = self.authorize()?;
            let mut value = HeaderValue::from_str(&token.authorization_header())
                .map_err(|_| AuthError::Malformed)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        debug!(endpoint = %self.endpoint, body_len = body.len(), "submitting request");
        let bytes = self
            .transport
            .submit(TransportRequest {
                url: self.endpoint.clone(),
                method: Method::POST,
                headers,
                body,
            })
            .await?;

        decode_envelope(&bytes)
    }
}

/// Classify a raw response body.
///
/// Errors win over data; a body that is not an object, or that has neither a
/// `data` nor an `errors` key, is unparseable.
pub fn decode_envelope<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, GraphqlClientError> {
    let text =
        std::str::from_utf8(bytes).map_err(|err| ProtocolError::Unparseable(err.to_string()))?;
    let value: Value = serde_json::from_str(text)?;

    let Value::Object(map) = value else {
        return Err(ProtocolError::Unparseable("response is not a JSON object".to_string()).into());
    };
    if !map.contains_key("data") && !map.contains_key("errors") {
        return Err(ProtocolError::Unparseable(
            "response has neither data nor errors".to_string(),
        )
        .into());
    }

    let envelope: GraphqlResponse<Value> = serde_json::from_value(Value::Object(map))?;
    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(RemoteError { errors }.into());
    }

    let data = envelope.data.ok_or(ProtocolError::EmptyPayload)?;
    Ok(serde_json::from_value(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Viewer {
        id: u64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct ViewerData {
        viewer: Viewer,
    }

    #[test]
    fn test_decode_data() {
        let data: ViewerData = decode_envelope(br#"{"data":{"Viewer":{"id":7}}}"#).unwrap();
        assert_eq!(data.viewer.id, 7);
    }

    #[test]
    fn test_errors_take_precedence_over_data() {
        let err = decode_envelope::<Value>(
            br#"{"data":{"Viewer":{"id":7}},"errors":[{"message":"Invalid token","status":400}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "[400] Invalid token");
    }

    #[test]
    fn test_null_locations_keep_remote_status() {
        let err = decode_envelope::<Value>(
            br#"{"data":null,"errors":[{"message":"Not Found.","status":404,"locations":null}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GraphqlClientError::Remote(_)));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "[404] Not Found.");
    }

    #[test]
    fn test_empty_error_list_is_ignored() {
        let data: Value = decode_envelope(br#"{"data":{"x":1},"errors":[]}"#).unwrap();
        assert_eq!(data["x"], 1);
    }

    #[test]
    fn test_null_data_is_empty_payload() {
        let err = decode_envelope::<Value>(br#"{"data":null}"#).unwrap_err();
        assert_eq!(err, GraphqlClientError::Protocol(ProtocolError::EmptyPayload));
    }

    #[test]
    fn test_unparseable_bodies() {
        let bodies: [&[u8]; 5] = [
            b"[1,2]",
            b"\"text\"",
            br#"{"message":"x"}"#,
            b"<html>",
            b"\xff\xfe",
        ];
        for body in bodies {
            let err = decode_envelope::<Value>(body).unwrap_err();
            assert!(
                matches!(err, GraphqlClientError::Protocol(ProtocolError::Unparseable(_))),
                "{err:?}"
            );
        }
    }

    #[test]
    fn test_default_config_headers() {
        let config = GraphqlClientConfig::default();
        assert_eq!(config.headers[CONTENT_TYPE], "application/json");
        assert_eq!(config.headers[ACCEPT], "application/json");
    }
}
