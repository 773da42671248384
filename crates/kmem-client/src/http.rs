//! reqwest-backed transports.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::{debug, instrument, Span};

use kmem_core::{logging, FormField, FormValue, Optional};

use crate::config::ClientConfig;
use crate::error::{Error, Result, TransportError};
use crate::transport::{AsyncTransport, HttpMethod, HttpRequest, RawResponse, RequestBody, Transport};

/// Base URL and headers sent on every request.
#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl Endpoint {
    fn new(config: &ClientConfig) -> Self {
        let mut headers = Vec::new();
        if let Some(auth) = config.auth_value() {
            headers.push((config.auth_header_name.clone(), auth));
        }
        headers.extend(config.headers.iter().cloned());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers<'a>(&'a self, request: &'a HttpRequest) -> impl Iterator<Item = &'a (String, String)> {
        self.headers.iter().chain(request.headers.iter())
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

// Async and blocking forms have the same builder API but distinct types.
macro_rules! build_form {
    ($form:ty, $part:ty, $fields:expr) => {{
        let mut form = <$form>::new();
        for field in $fields {
            form = match &field.value {
                FormValue::Text(text) => form.text(field.name.clone(), text.clone()),
                FormValue::File(file) => {
                    let mut part =
                        <$part>::bytes(file.content.0.clone()).file_name(file.file_name.clone());
                    if let Optional::Present(content_type) = &file.content_type {
                        part = part.mime_str(content_type)?;
                    }
                    form.part(field.name.clone(), part)
                }
            };
        }
        form
    }};
}

fn async_form(fields: &[FormField]) -> std::result::Result<reqwest::multipart::Form, TransportError> {
    Ok(build_form!(
        reqwest::multipart::Form,
        reqwest::multipart::Part,
        fields
    ))
}

fn blocking_form(
    fields: &[FormField],
) -> std::result::Result<reqwest::blocking::multipart::Form, TransportError> {
    Ok(build_form!(
        reqwest::blocking::multipart::Form,
        reqwest::blocking::multipart::Part,
        fields
    ))
}

/// Async transport over `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = reqwest::Client::builder().timeout(config.timeout());
        if !config.verify_ssl {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: Endpoint::new(config),
        })
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    #[instrument(
        skip(self, request),
        fields(
            subsystem = "client",
            component = "reqwest",
            method = %request.method,
            path = %request.path,
            status = tracing::field::Empty,
            body_len = tracing::field::Empty,
        )
    )]
    async fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), self.endpoint.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in self.endpoint.headers(request) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(fields) => builder.multipart(async_form(fields)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response.bytes().await?.to_vec();

        record_response(status, body.len());
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn record_response(status: u16, body_len: usize) {
    let span = Span::current();
    span.record(logging::STATUS, status);
    span.record(logging::BODY_LEN, body_len as u64);
    debug!("Response received");
}

/// Blocking transport over `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
    endpoint: Endpoint,
}

impl BlockingReqwestTransport {
    /// Must be called outside an async runtime.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = reqwest::blocking::Client::builder().timeout(config.timeout());
        if !config.verify_ssl {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: Endpoint::new(config),
        })
    }
}

impl Transport for BlockingReqwestTransport {
    #[instrument(
        skip(self, request),
        fields(
            subsystem = "client",
            component = "reqwest_blocking",
            method = %request.method,
            path = %request.path,
            status = tracing::field::Empty,
            body_len = tracing::field::Empty,
        )
    )]
    fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), self.endpoint.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in self.endpoint.headers(request) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(fields) => builder.multipart(blocking_form(fields)?),
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response.bytes()?.to_vec();

        record_response(status, body.len());
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
