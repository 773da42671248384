//! Three-state field values.
//!
//! The memory service distinguishes a key that is missing from a key that is
//! present with `null`. `Optional<T>` keeps that distinction through decode
//! and encode:
//!
//! | State        | Encode                 | Decode from          |
//! |--------------|------------------------|----------------------|
//! | `Absent`     | key omitted            | key missing          |
//! | `Null`       | `"key": null`          | `"key": null`        |
//! | `Present(v)` | `"key": encode(v)`     | any other value      |

use crate::codec::WireCodec;
use crate::error::{DecodeError, Result};
use crate::wire::{WireObject, WireValue};

/// A field that may be absent, explicitly null, or present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optional<T> {
    Absent,
    Null,
    Present(T),
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Optional::Absent
    }
}

impl<T> Optional<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Optional::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Optional::Null)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Optional::Present(_))
    }

    /// Borrow the value if present.
    pub fn present(&self) -> Option<&T> {
        match self {
            Optional::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Optional<&T> {
        match self {
            Optional::Absent => Optional::Absent,
            Optional::Null => Optional::Null,
            Optional::Present(value) => Optional::Present(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        match self {
            Optional::Absent => Optional::Absent,
            Optional::Null => Optional::Null,
            Optional::Present(value) => Optional::Present(f(value)),
        }
    }

    /// Collapse Absent and Null into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Optional::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Optional::Present(value),
            None => Optional::Null,
        }
    }
}

impl<T: WireCodec> WireCodec for Optional<T> {
    fn to_wire(&self) -> WireValue {
        match self {
            Optional::Present(value) => value.to_wire(),
            Optional::Absent | Optional::Null => WireValue::Null,
        }
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Null => Ok(Optional::Null),
            other => T::from_wire(other).map(Optional::Present),
        }
    }

    fn when_absent() -> Option<Self> {
        Some(Optional::Absent)
    }

    fn is_absent(&self) -> bool {
        Optional::is_absent(self)
    }
}

/// Write one field into an object, omitting the key when the value is absent.
pub fn encode_field<F: WireCodec>(name: &str, value: &F, into: &mut WireObject) {
    if value.is_absent() {
        return;
    }
    into.insert(name.to_string(), value.to_wire());
}

/// Read one field from an object.
///
/// A missing key is only an error for types without an absent state.
pub fn decode_field<F: WireCodec>(model: &'static str, name: &str, from: &WireObject) -> Result<F> {
    decode_entry(model, name, from.get(name).cloned())
}

pub(crate) fn decode_entry<F: WireCodec>(
    model: &'static str,
    name: &str,
    entry: Option<WireValue>,
) -> Result<F> {
    match entry {
        None => F::when_absent().ok_or_else(|| DecodeError::MissingRequiredField {
            model,
            field: name.to_string(),
        }),
        Some(value) => F::from_wire(value).map_err(|e| e.within_field(name)),
    }
}
