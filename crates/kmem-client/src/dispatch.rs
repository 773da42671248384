//! Status-code dispatch.
//!
//! Every operation declares a static table mapping the statuses it knows to
//! a decode path. The dispatcher sends the request, looks the status up and
//! decodes the body as the type that path names:
//!
//! | Path          | Outcome                                  |
//! |---------------|------------------------------------------|
//! | `Primary`     | `Outcome::Decoded(T)`                    |
//! | `Alternate`   | `Outcome::Alternate(U)` (problem bodies) |
//! | `Acknowledge` | `Outcome::Acknowledged`, body not read   |
//! | not listed    | `Error::UnexpectedStatus` or `Outcome::Unrecognized` |
//!
//! A body that fails to decode under its declared type is an error; it is
//! never turned into `Unrecognized`.

use std::marker::PhantomData;
use std::time::Instant;

use tracing::{debug, instrument, warn, Span};

use kmem_core::wire::parse_body;
use kmem_core::{logging, Model};

use crate::error::{Error, Result};
use crate::transport::{AsyncTransport, HttpRequest, RawResponse, Transport};

/// How to treat the body of a listed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    Primary,
    Alternate,
    Acknowledge,
}

impl DecodePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodePath::Primary => "primary",
            DecodePath::Alternate => "alternate",
            DecodePath::Acknowledge => "acknowledge",
        }
    }
}

/// Status code to decode path, declared once per operation.
pub type StatusTable = &'static [(u16, DecodePath)];

/// Parsed result of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, U> {
    Decoded(T),
    Alternate(U),
    Acknowledged,
    Unrecognized,
}

impl<T, U> Outcome<T, U> {
    pub fn decoded(self) -> Option<T> {
        match self {
            Outcome::Decoded(value) => Some(value),
            _ => None,
        }
    }

    pub fn alternate(self) -> Option<U> {
        match self {
            Outcome::Alternate(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Outcome::Decoded(_))
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Outcome::Unrecognized)
    }
}

/// A parsed outcome together with what the service actually sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<P> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub content: Vec<u8>,
    pub parsed: P,
}

/// One operation ready to send: request, status table and result types.
#[derive(Debug, Clone)]
pub struct Call<T, U> {
    pub operation: &'static str,
    pub request: HttpRequest,
    pub statuses: StatusTable,
    _types: PhantomData<fn() -> (T, U)>,
}

impl<T: Model, U: Model> Call<T, U> {
    pub fn new(operation: &'static str, request: HttpRequest, statuses: StatusTable) -> Self {
        Self {
            operation,
            request,
            statuses,
            _types: PhantomData,
        }
    }

    pub fn decode_path(&self, status: u16) -> Option<DecodePath> {
        self.statuses
            .iter()
            .find(|(listed, _)| *listed == status)
            .map(|(_, path)| *path)
    }
}

/// Sends calls and turns responses into outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatcher {
    raise_on_unexpected_status: bool,
}

impl Dispatcher {
    pub fn new(raise_on_unexpected_status: bool) -> Self {
        Self {
            raise_on_unexpected_status,
        }
    }

    pub fn raises_on_unexpected_status(&self) -> bool {
        self.raise_on_unexpected_status
    }

    /// Decode a received response. Shared by both execution modes.
    pub fn decode<T: Model, U: Model>(
        &self,
        call: &Call<T, U>,
        raw: RawResponse,
    ) -> Result<Response<Outcome<T, U>>> {
        let path = call.decode_path(raw.status);
        let span = Span::current();
        span.record(logging::STATUS, raw.status);
        span.record(
            logging::DECODE_PATH,
            path.map(|p| p.as_str()).unwrap_or("unrecognized"),
        );

        let parsed = match path {
            Some(DecodePath::Primary) => Outcome::Decoded(T::decode(parse_body(&raw.body)?)?),
            Some(DecodePath::Alternate) => Outcome::Alternate(U::decode(parse_body(&raw.body)?)?),
            Some(DecodePath::Acknowledge) => Outcome::Acknowledged,
            None if self.raise_on_unexpected_status => {
                return Err(Error::UnexpectedStatus {
                    status: raw.status,
                    body: raw.body,
                });
            }
            None => {
                warn!(
                    op = call.operation,
                    status = raw.status,
                    "Unexpected status, returning unrecognized outcome"
                );
                Outcome::Unrecognized
            }
        };

        Ok(Response {
            status: raw.status,
            headers: raw.headers,
            content: raw.body,
            parsed,
        })
    }

    /// Blocking mode.
    #[instrument(
        skip(self, transport, call),
        fields(
            subsystem = "client",
            component = "dispatch",
            op = call.operation,
            method = %call.request.method,
            path = %call.request.path,
            status = tracing::field::Empty,
            decode_path = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    pub fn send<T: Model, U: Model>(
        &self,
        transport: &dyn Transport,
        call: Call<T, U>,
    ) -> Result<Response<Outcome<T, U>>> {
        let started = Instant::now();
        let raw = transport.send(&call.request)?;
        let response = self.decode(&call, raw);
        finish(started);
        response
    }

    /// Awaitable mode. Suspends only while the transport is in flight.
    #[instrument(
        skip(self, transport, call),
        fields(
            subsystem = "client",
            component = "dispatch",
            op = call.operation,
            method = %call.request.method,
            path = %call.request.path,
            status = tracing::field::Empty,
            decode_path = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    pub async fn send_async<T: Model, U: Model>(
        &self,
        transport: &dyn AsyncTransport,
        call: Call<T, U>,
    ) -> Result<Response<Outcome<T, U>>> {
        let started = Instant::now();
        let raw = transport.send(&call.request).await?;
        let response = self.decode(&call, raw);
        finish(started);
        response
    }
}

fn finish(started: Instant) {
    let duration_ms = started.elapsed().as_millis() as u64;
    Span::current().record(logging::DURATION_MS, duration_ms);
    debug!(duration_ms, "Call dispatched");
}
