//! Decode errors for kmem wire models.

use thiserror::Error;

use crate::wire::{kind_name, WireValue};

/// Result type alias using kmem-core's decode error.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Error raised when a wire value cannot be turned into a typed value.
///
/// Paths are dotted field paths relative to the value handed to `decode`
/// (`results[0].partitions[2].lastUpdate`). They are built from the inside
/// out as the error propagates through nested models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A non-optional field was absent from the payload.
    #[error("Missing required field '{field}' in {model}")]
    MissingRequiredField { model: &'static str, field: String },

    /// The wire value has the wrong JSON kind for the target type.
    #[error("Invalid type at {}: expected {expected}, found {found}", display_path(.path))]
    InvalidType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A timestamp string is not valid ISO-8601.
    #[error("Invalid timestamp at {}: '{value}'", display_path(.path))]
    InvalidTimestamp { path: String, value: String },

    /// A string enum received a value outside its variant set.
    #[error("Unknown variant at {}: '{value}'", display_path(.path))]
    UnknownVariant { path: String, value: String },

    /// The body is not JSON at all.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),
}

impl DecodeError {
    /// Type mismatch at the current position.
    pub fn invalid_type(expected: &'static str, found: &WireValue) -> Self {
        DecodeError::InvalidType {
            path: String::new(),
            expected,
            found: kind_name(found),
        }
    }

    /// Malformed timestamp at the current position.
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        DecodeError::InvalidTimestamp {
            path: String::new(),
            value: value.into(),
        }
    }

    /// Unknown enum variant at the current position.
    pub fn unknown_variant(value: impl Into<String>) -> Self {
        DecodeError::UnknownVariant {
            path: String::new(),
            value: value.into(),
        }
    }

    /// Prefix the error path with an object field name.
    pub fn within_field(self, field: &str) -> Self {
        self.prefix_path(field)
    }

    /// Prefix the error path with an array index.
    pub fn within_index(self, index: usize) -> Self {
        self.prefix_path(&format!("[{}]", index))
    }

    /// Field path of the failure, if the variant carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::MissingRequiredField { field, .. } => Some(field),
            DecodeError::InvalidType { path, .. }
            | DecodeError::InvalidTimestamp { path, .. }
            | DecodeError::UnknownVariant { path, .. } => Some(path),
            DecodeError::InvalidJson(_) => None,
        }
    }

    fn prefix_path(mut self, head: &str) -> Self {
        match &mut self {
            DecodeError::MissingRequiredField { field: path, .. }
            | DecodeError::InvalidType { path, .. }
            | DecodeError::InvalidTimestamp { path, .. }
            | DecodeError::UnknownVariant { path, .. } => {
                *path = join_path(head, path);
            }
            DecodeError::InvalidJson(_) => {}
        }
        self
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::InvalidJson(e.to_string())
    }
}

fn join_path(head: &str, tail: &str) -> String {
    if tail.is_empty() {
        head.to_string()
    } else if tail.starts_with('[') {
        format!("{}{}", head, tail)
    } else {
        format!("{}.{}", head, tail)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_type_display_at_root() {
        let err = DecodeError::invalid_type("object", &json!([1, 2]));
        assert_eq!(
            err.to_string(),
            "Invalid type at <root>: expected object, found array"
        );
    }

    #[test]
    fn test_path_builds_from_inside_out() {
        let err = DecodeError::invalid_timestamp("yesterday")
            .within_field("lastUpdate")
            .within_index(2)
            .within_field("partitions")
            .within_index(0)
            .within_field("results");

        assert_eq!(err.path(), Some("results[0].partitions[2].lastUpdate"));
        assert_eq!(
            err.to_string(),
            "Invalid timestamp at results[0].partitions[2].lastUpdate: 'yesterday'"
        );
    }

    #[test]
    fn test_missing_field_path_is_prefixed() {
        let err = DecodeError::MissingRequiredField {
            model: "UploadFile",
            field: "fileName".to_string(),
        }
        .within_index(1);

        assert_eq!(err.path(), Some("[1].fileName"));
        assert!(err.to_string().contains("UploadFile"));
    }

    #[test]
    fn test_invalid_json_has_no_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DecodeError = json_err.into();
        assert!(err.path().is_none());
        assert!(err.to_string().starts_with("Invalid JSON body:"));
        assert_eq!(err.clone().within_field("ignored"), err);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<DecodeError>();
        assert_sync::<DecodeError>();
    }
}
