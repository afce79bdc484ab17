//! Mock GraphQL endpoint for end-to-end connector tests.
//!
//! Wraps wiremock with the few response shapes a GraphQL service produces.

use serde_json::Value;
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A wiremock server posing as the remote GraphQL endpoint.
pub struct MockGraphqlServer {
    server: MockServer,
}

impl MockGraphqlServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Endpoint URL to configure the client with.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.server.uri()
    }

    /// Get the underlying wiremock server for advanced configuration.
    #[must_use]
    pub const fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Answer every POST with `{"data": data}`.
    pub async fn respond_with_data(&self, data: Value) {
        Mock::given(method("POST"))
            .respond_with(json_response(200, &serde_json::json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Answer POSTs whose body contains `fragment` (usually a root field name)
    /// with `{"data": data}`.
    pub async fn respond_to(&self, fragment: &str, data: Value) {
        Mock::given(method("POST"))
            .and(body_string_contains(fragment))
            .respond_with(json_response(200, &serde_json::json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Answer POSTs carrying `Authorization: Bearer <token>` with `{"data": data}`.
    pub async fn respond_when_authorized(&self, token: &str, data: Value) {
        Mock::given(method("POST"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(json_response(200, &serde_json::json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Answer every POST with one remote error, mirroring the status on HTTP.
    pub async fn respond_with_error(&self, status: u16, message: &str) {
        let body = serde_json::json!({
            "data": null,
            "errors": [{ "message": message, "status": status }]
        });
        Mock::given(method("POST"))
            .respond_with(json_response(status, &body))
            .mount(&self.server)
            .await;
    }

    /// Parsed JSON bodies of every request received so far.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

fn json_response(status: u16, body: &Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(body)
        .insert_header("content-type", "application/json")
}
