//! Scripted transport scheduler.
//!
//! Replays queued responses in order and records every request it receives,
//! so connector tests can assert on the exact variables and headers sent
//! without a network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracker_graphql::{Transport, TransportError, TransportRequest};

/// Transport that answers from a queue of canned responses.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<Vec<u8>, TransportError>>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw response bytes.
    pub fn push_bytes(&self, bytes: impl Into<Vec<u8>>) -> &Self {
        self.responses.lock().push_back(Ok(bytes.into()));
        self
    }

    /// Queue a JSON body.
    pub fn push_json(&self, body: &Value) -> &Self {
        self.push_bytes(body.to_string())
    }

    /// Queue a `{"data": ...}` envelope.
    pub fn push_data(&self, data: Value) -> &Self {
        self.push_json(&serde_json::json!({ "data": data }))
    }

    /// Queue an envelope carrying one remote error.
    pub fn push_error(&self, status: u16, message: &str) -> &Self {
        self.push_json(&serde_json::json!({
            "data": null,
            "errors": [{ "message": message, "status": status }]
        }))
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .push_back(Err(TransportError::new(message)));
        self
    }

    /// Every request submitted so far.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests submitted so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Parsed JSON body of the `index`th request.
    #[must_use]
    pub fn request_body(&self, index: usize) -> Value {
        let requests = self.requests.lock();
        let request = requests
            .get(index)
            .unwrap_or_else(|| panic!("no request at index {index}"));
        serde_json::from_slice(&request.body).expect("request body is JSON")
    }

    /// Variables sent with the `index`th request.
    #[must_use]
    pub fn request_variables(&self, index: usize) -> Value {
        self.request_body(index)["variables"].clone()
    }

    /// `Authorization` header of the `index`th request, if any.
    #[must_use]
    pub fn authorization(&self, index: usize) -> Option<String> {
        self.requests.lock().get(index).and_then(|request| {
            request
                .headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
    }

    /// Responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response left")))
    }
}
