//! Field codec: conversion between wire values and typed field values.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};

use crate::error::{DecodeError, Result};
use crate::optional::{decode_entry, encode_field};
use crate::wire::{expect_object, WireObject, WireValue};

/// Timestamp type used by every date-time field.
pub type Timestamp = DateTime<FixedOffset>;

/// Conversion between a typed value and its wire form.
///
/// `when_absent` and `is_absent` let a type describe what a missing key
/// means. Only [`Optional`](crate::Optional) has an absent state; every
/// other type treats a missing key as a required-field error.
pub trait WireCodec: Sized {
    fn to_wire(&self) -> WireValue;

    fn from_wire(value: WireValue) -> Result<Self>;

    /// Value to use when the key is missing, if the type allows it.
    fn when_absent() -> Option<Self> {
        None
    }

    /// Whether the key should be omitted on encode.
    fn is_absent(&self) -> bool {
        false
    }
}

impl WireCodec for WireValue {
    fn to_wire(&self) -> WireValue {
        self.clone()
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        Ok(value)
    }
}

impl WireCodec for String {
    fn to_wire(&self) -> WireValue {
        WireValue::String(self.clone())
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::String(s) => Ok(s),
            other => Err(DecodeError::invalid_type("string", &other)),
        }
    }
}

impl WireCodec for bool {
    fn to_wire(&self) -> WireValue {
        WireValue::Bool(*self)
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Bool(b) => Ok(b),
            other => Err(DecodeError::invalid_type("boolean", &other)),
        }
    }
}

impl WireCodec for i64 {
    fn to_wire(&self) -> WireValue {
        WireValue::from(*self)
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        if let Some(n) = value.as_i64() {
            return Ok(n);
        }
        // 3.0 is still an integer
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
            _ => Err(DecodeError::invalid_type("integer", &value)),
        }
    }
}

impl WireCodec for f64 {
    fn to_wire(&self) -> WireValue {
        // JSON has no NaN or infinity.
        serde_json::Number::from_f64(*self)
            .map(WireValue::Number)
            .unwrap_or(WireValue::Null)
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value.as_f64() {
            Some(n) => Ok(n),
            None => Err(DecodeError::invalid_type("number", &value)),
        }
    }
}

impl WireCodec for Timestamp {
    fn to_wire(&self) -> WireValue {
        WireValue::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::String(s) => parse_timestamp(&s).ok_or_else(|| DecodeError::invalid_timestamp(s)),
            other => Err(DecodeError::invalid_type("timestamp string", &other)),
        }
    }
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parse an ISO-8601 date-time.
///
/// Accepts RFC 3339, minute precision (`2024-05-01T10:20Z`), any number of
/// fraction digits, and a bare date (`2024-05-01`, midnight). Values without
/// an offset are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }

    let zulu = s.strip_suffix('Z').or_else(|| s.strip_suffix('z'));
    if zulu.is_none() {
        let with_offset = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(s, format).ok());
        if with_offset.is_some() {
            return with_offset;
        }
    }

    let local = zulu.unwrap_or(s);
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(local, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Nullable element. `None` encodes as `null`; a missing key is still an error.
impl<T: WireCodec> WireCodec for Option<T> {
    fn to_wire(&self) -> WireValue {
        match self {
            Some(value) => value.to_wire(),
            None => WireValue::Null,
        }
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Null => Ok(None),
            other => T::from_wire(other).map(Some),
        }
    }
}

/// Lists decode element-wise and fail as a whole on the first bad element.
impl<T: WireCodec> WireCodec for Vec<T> {
    fn to_wire(&self) -> WireValue {
        WireValue::Array(self.iter().map(WireCodec::to_wire).collect())
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_wire(item).map_err(|e| e.within_index(i)))
                .collect(),
            other => Err(DecodeError::invalid_type("array", &other)),
        }
    }
}

impl<T: WireCodec> WireCodec for BTreeMap<String, T> {
    fn to_wire(&self) -> WireValue {
        WireValue::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_wire()))
                .collect(),
        )
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        expect_object(value)?
            .into_iter()
            .map(|(key, value)| match T::from_wire(value) {
                Ok(decoded) => Ok((key, decoded)),
                Err(e) => Err(e.within_field(&key)),
            })
            .collect()
    }
}

/// Static mapping between an in-memory field name and its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName {
    pub ident: &'static str,
    pub wire: &'static str,
}

impl FieldName {
    pub const fn new(ident: &'static str, wire: &'static str) -> Self {
        Self { ident, wire }
    }
}

/// Wire name for an in-memory field name.
pub fn wire_name_of(fields: &[FieldName], ident: &str) -> Option<&'static str> {
    fields.iter().find(|f| f.ident == ident).map(|f| f.wire)
}

/// In-memory field name for a wire name.
pub fn ident_of(fields: &[FieldName], wire: &str) -> Option<&'static str> {
    fields.iter().find(|f| f.wire == wire).map(|f| f.ident)
}

/// Builds a model's wire object one field at a time.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    object: WireObject,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from captured fields; declared fields written later replace
    /// any captured value under the same key.
    pub fn with_captured(captured: &WireObject) -> Self {
        Self {
            object: captured.clone(),
        }
    }

    pub fn field<F: WireCodec>(&mut self, wire: &str, value: &F) -> &mut Self {
        encode_field(wire, value, &mut self.object);
        self
    }

    pub fn finish(self) -> WireValue {
        WireValue::Object(self.object)
    }
}

/// Takes declared fields out of a wire object, leaving the unknown keys.
#[derive(Debug)]
pub struct ObjectReader {
    model: &'static str,
    object: WireObject,
}

impl ObjectReader {
    /// Fails with `InvalidType` unless the value is an object.
    pub fn new(model: &'static str, value: WireValue) -> Result<Self> {
        Ok(Self {
            model,
            object: expect_object(value)?,
        })
    }

    pub fn field<F: WireCodec>(&mut self, wire: &str) -> Result<F> {
        let entry = self.object.shift_remove(wire);
        decode_entry(self.model, wire, entry)
    }

    /// Keys not claimed by any declared field.
    pub fn into_remainder(self) -> WireObject {
        self.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optional::Optional;
    use serde_json::json;

    #[test]
    fn test_integer_rejects_fraction() {
        assert_eq!(i64::from_wire(json!(3)).unwrap(), 3);
        assert_eq!(i64::from_wire(json!(3.0)).unwrap(), 3);
        let err = i64::from_wire(json!(3.5)).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidType { expected: "integer", .. }));
    }

    #[test]
    fn test_float_accepts_integers_and_drops_nan() {
        assert_eq!(f64::from_wire(json!(2)).unwrap(), 2.0);
        assert_eq!(f64::NAN.to_wire(), WireValue::Null);
        assert_eq!(0.5_f64.to_wire(), json!(0.5));
    }

    #[test]
    fn test_string_type_mismatch() {
        let err = String::from_wire(json!(12)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid type at <root>: expected string, found number");
    }

    #[test]
    fn test_timestamp_roundtrip_keeps_offset_and_precision() {
        let ts = Timestamp::from_wire(json!("2024-05-01T10:20:30.123456+02:00")).unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 7200);
        assert_eq!(ts.to_wire(), json!("2024-05-01T10:20:30.123456+02:00"));
        assert_eq!(Timestamp::from_wire(ts.to_wire()).unwrap(), ts);
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let ts = Timestamp::from_wire(json!("2024-05-01T10:20:30")).unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(ts.to_wire(), json!("2024-05-01T10:20:30+00:00"));
    }

    #[test]
    fn test_timestamp_accepts_short_iso_forms() {
        let cases = [
            ("2024-05-01", "2024-05-01T00:00:00+00:00"),
            ("20240501", "2024-05-01T00:00:00+00:00"),
            ("2024-05-01T10:20Z", "2024-05-01T10:20:00+00:00"),
            ("2024-05-01T10:20", "2024-05-01T10:20:00+00:00"),
            ("2024-05-01T10:20+02:00", "2024-05-01T10:20:00+02:00"),
            ("2024-05-01T10:20:30.1234567Z", "2024-05-01T10:20:30.123456700+00:00"),
        ];

        for (input, expected) in cases {
            let ts = Timestamp::from_wire(json!(input))
                .unwrap_or_else(|e| panic!("{} rejected: {}", input, e));
            assert_eq!(ts.to_wire(), json!(expected), "input {}", input);
        }
    }

    #[test]
    fn test_timestamp_rejects_partial_dates() {
        for input in ["2024-05", "2024-05-01T", "2024-13-01", "10:20:30"] {
            assert!(parse_timestamp(input).is_none(), "{} accepted", input);
        }
    }

    #[test]
    fn test_malformed_timestamp() {
        let err = Timestamp::from_wire(json!("last tuesday")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidTimestamp {
                path: String::new(),
                value: "last tuesday".to_string(),
            }
        );
    }

    #[test]
    fn test_list_decode_is_atomic_with_index_path() {
        let err = Vec::<String>::from_wire(json!(["a", "b", 3])).unwrap_err();
        assert_eq!(err.path(), Some("[2]"));

        let ok = Vec::<String>::from_wire(json!(["a", "b"])).unwrap();
        assert_eq!(ok, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_nullable_elements() {
        let items = Vec::<Option<String>>::from_wire(json!(["x", null])).unwrap();
        assert_eq!(items, vec![Some("x".to_string()), None]);
        assert_eq!(items.to_wire(), json!(["x", null]));
    }

    #[test]
    fn test_map_error_path_uses_key() {
        let err = BTreeMap::<String, i64>::from_wire(json!({"ok": 1, "bad": "x"})).unwrap_err();
        assert_eq!(err.path(), Some("bad"));
    }

    #[test]
    fn test_name_table_lookups() {
        const FIELDS: &[FieldName] = &[
            FieldName::new("document_id", "documentId"),
            FieldName::new("index", "index"),
        ];
        assert_eq!(wire_name_of(FIELDS, "document_id"), Some("documentId"));
        assert_eq!(ident_of(FIELDS, "documentId"), Some("document_id"));
        assert_eq!(wire_name_of(FIELDS, "documentId"), None);
        assert_eq!(ident_of(FIELDS, "DocumentId"), None);
    }

    #[test]
    fn test_reader_leaves_unclaimed_keys() {
        let mut reader = ObjectReader::new("T", json!({"a": 1, "b": null, "extra": true})).unwrap();
        let a: i64 = reader.field("a").unwrap();
        let b: Optional<i64> = reader.field("b").unwrap();
        let c: Optional<i64> = reader.field("c").unwrap();

        assert_eq!((a, b, c), (1, Optional::Null, Optional::Absent));
        assert_eq!(WireValue::Object(reader.into_remainder()), json!({"extra": true}));
    }

    #[test]
    fn test_reader_rejects_non_object() {
        let err = ObjectReader::new("T", json!([1])).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidType { found: "array", .. }));
    }

    #[test]
    fn test_writer_declared_field_overrides_captured() {
        let captured = json!({"title": "old", "x": 1}).as_object().cloned().unwrap();
        let mut writer = ObjectWriter::with_captured(&captured);
        writer.field("title", &Optional::Present("new".to_string()));
        writer.field("detail", &Optional::<String>::Absent);

        assert_eq!(writer.finish(), json!({"title": "new", "x": 1}));
    }
}
