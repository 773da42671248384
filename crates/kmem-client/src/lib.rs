//! # kmem-client
//!
//! REST client for the kmem memory service.
//!
//! Requests are described by [`api`] as [`Call`]s: an HTTP request plus a
//! table saying which response type each status code carries. A
//! [`Dispatcher`] sends a call over a [`Transport`] (blocking) or an
//! [`AsyncTransport`] (awaitable) and decodes the body into an [`Outcome`].
//!
//! ```no_run
//! use kmem_client::{ClientConfig, MemoryClient, Outcome};
//!
//! # async fn run() -> kmem_client::Result<()> {
//! let client = MemoryClient::new(ClientConfig::new("http://localhost:9001").with_token("secret"))?;
//! let query = client.search_query("vector databases").limit(5);
//!
//! match client.search(&query).await? {
//!     Outcome::Decoded(result) => {
//!         for citation in result.citations() {
//!             println!("{:?}", citation.source_name);
//!         }
//!     }
//!     Outcome::Alternate(problem) => eprintln!("{}", problem),
//!     Outcome::Acknowledged | Outcome::Unrecognized => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod mock;
pub mod transport;

// Re-export commonly used types at crate root
pub use client::{BlockingMemoryClient, MemoryClient};
pub use config::ClientConfig;
pub use dispatch::{Call, DecodePath, Dispatcher, Outcome, Response, StatusTable};
pub use error::{Error, Result, TransportError};
pub use http::{BlockingReqwestTransport, ReqwestTransport};
pub use transport::{AsyncTransport, HttpMethod, HttpRequest, RawResponse, RequestBody, Transport};
