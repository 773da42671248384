//! Canned transport for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use kmem_client::mock::MockTransport;
//! use kmem_client::{BlockingMemoryClient, ClientConfig};
//! use serde_json::json;
//!
//! let transport = MockTransport::new().with_json(200, json!({"results": [{"name": "default"}]}));
//! let client = BlockingMemoryClient::with_transport(transport.clone(), &ClientConfig::default());
//!
//! let indexes = client.list_indexes().unwrap().decoded().unwrap();
//! assert_eq!(indexes.names(), vec!["default"]);
//! assert_eq!(transport.requests()[0].path, "/indexes");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use kmem_core::WireValue;

use crate::error::TransportError;
use crate::transport::{AsyncTransport, HttpRequest, RawResponse, Transport};

/// Replays queued responses in order and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<RawResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn with_json(self, status: u16, body: WireValue) -> Self {
        self.with_raw(RawResponse::new(status, body.to_string()))
    }

    pub fn with_raw(self, response: RawResponse) -> Self {
        lock(&self.responses).push_back(Ok(response));
        self
    }

    pub fn with_error(self, error: TransportError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    fn respond(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Request(format!(
                "no canned response for {} {}",
                request.method, request.path
            )))
        })
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.respond(request)
    }
}

#[async_trait]
impl AsyncTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.respond(request)
    }
}
