//! Wire values exchanged with the memory service.
//!
//! The wire format is JSON. `serde_json` is built with `preserve_order`, so
//! object keys keep their insertion order for logs and diagnostics; object
//! equality still ignores order.

use crate::error::{DecodeError, Result};

/// A JSON value as it appears on the wire.
pub type WireValue = serde_json::Value;

/// A JSON object with string keys.
pub type WireObject = serde_json::Map<String, WireValue>;

/// Human-readable kind of a wire value, used in decode errors.
pub fn kind_name(value: &WireValue) -> &'static str {
    match value {
        WireValue::Null => "null",
        WireValue::Bool(_) => "boolean",
        WireValue::Number(_) => "number",
        WireValue::String(_) => "string",
        WireValue::Array(_) => "array",
        WireValue::Object(_) => "object",
    }
}

/// Parse a response body. An empty (or whitespace-only) body is `Null`.
pub fn parse_body(bytes: &[u8]) -> Result<WireValue> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(WireValue::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Unwrap an object, or report what was found instead.
pub fn expect_object(value: WireValue) -> Result<WireObject> {
    match value {
        WireValue::Object(object) => Ok(object),
        other => Err(DecodeError::invalid_type("object", &other)),
    }
}
