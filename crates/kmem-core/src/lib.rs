//! # kmem-core
//!
//! Wire values, tri-state fields and typed models for the kmem
//! memory-service client.
//!
//! Every record the service sends or accepts is declared once with
//! [`wire_model!`], which fixes its wire names and generates its
//! [`Model`] implementation. Fields use [`Optional`] to keep "missing" and
//! "null" apart, and [`OrRaw`] where the service may send a shape the client
//! does not know.

pub mod codec;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod model;
pub mod models;
pub mod optional;
pub mod resolver;
pub mod wire;

// Re-export commonly used types at crate root
pub use codec::{FieldName, ObjectReader, ObjectWriter, Timestamp, WireCodec};
pub use error::{DecodeError, Result};
pub use model::{AdditionalFields, Model, OpenModel};
pub use models::*;
pub use optional::{decode_field, encode_field, Optional};
pub use resolver::{resolve_polymorphic, OrRaw, Polymorphic, Resolution, Resolver};
pub use wire::{parse_body, WireObject, WireValue};

#[doc(hidden)]
pub use serde;
