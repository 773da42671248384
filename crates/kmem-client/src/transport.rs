//! The HTTP contract the dispatcher needs from a transport.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use kmem_core::{FormField, Optional, WireValue};

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(WireValue),
    Multipart(Vec<FormField>),
}

/// A request relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    /// Add a query parameter. Absent and null values are left out entirely.
    pub fn query_param(mut self, name: &str, value: Optional<&str>) -> Self {
        if let Optional::Present(value) = value {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: WireValue) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status, headers and body bytes as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// First header with this name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Blocking transport. Must not be driven from inside an async runtime.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Awaitable transport. Dropping the future abandons the request.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_omits_absent_and_null() {
        let request = HttpRequest::new(HttpMethod::Get, "/upload-status")
            .query_param("index", Optional::Absent)
            .query_param("other", Optional::Null)
            .query_param("documentId", Optional::Present("doc-1"));

        assert_eq!(
            request.query,
            vec![("documentId".to_string(), "doc-1".to_string())]
        );
    }

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::new(HttpMethod::Delete, "/indexes");
        assert_eq!(request.body, RequestBody::Empty);
        assert!(request.timeout.is_none());
        assert_eq!(request.method.to_string(), "DELETE");
    }

    #[test]
    fn test_response_header_lookup_ignores_case() {
        let mut response = RawResponse::new(200, "{}");
        response
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
