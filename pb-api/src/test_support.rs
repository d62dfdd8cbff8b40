//! Scripted transport stub for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pb_core::error::{PbError, PbResult};
use serde_json::Value;

use crate::transport::{ApiRequest, Transport};

/// Records every request and replays scripted responses in order. Once the
/// script is exhausted it answers `Value::Null`.
pub(crate) struct StubTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<PbResult<Value>>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        })
    }

    /// Queue the next response.
    pub fn respond(&self, response: PbResult<Value>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Number of requests executed so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The nth recorded request.
    pub fn request(&self, index: usize) -> ApiRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    /// JSON body of the nth recorded request; panics if it has none.
    pub fn json_body(&self, index: usize) -> Value {
        match &self.request(index).body {
            crate::transport::Body::Json(value) => value.clone(),
            other => panic!("request {index} has no JSON body: {other:?}"),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: ApiRequest) -> PbResult<Value> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

/// A canned 404 in the shape the transport produces.
pub(crate) fn not_found(message: &str) -> PbError {
    PbError::NotFound(message.to_string())
}
