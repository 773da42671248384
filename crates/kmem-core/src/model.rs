//! Model contract shared by every request and response record.

use crate::codec::{ident_of, wire_name_of, FieldName};
use crate::error::Result;
use crate::wire::{parse_body, WireObject, WireValue};

/// A record with a fixed set of declared wire fields.
///
/// Implementations are generated by [`wire_model!`](crate::wire_model).
pub trait Model: Sized {
    /// Model name used in error messages.
    const NAME: &'static str;

    /// Declared fields, in encode order.
    const FIELDS: &'static [FieldName];

    /// Encode to a wire object. Total.
    fn encode(&self) -> WireValue;

    /// Decode from a wire value. Non-objects are `InvalidType`.
    fn decode(value: WireValue) -> Result<Self>;

    fn wire_name(ident: &str) -> Option<&'static str> {
        wire_name_of(Self::FIELDS, ident)
    }

    fn ident_for(wire: &str) -> Option<&'static str> {
        ident_of(Self::FIELDS, wire)
    }

    fn to_json_string(&self) -> String {
        self.encode().to_string()
    }

    fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Self::decode(parse_body(bytes)?)
    }
}

/// Unknown keys captured while decoding an open model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalFields(WireObject);

impl AdditionalFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.0.get(key)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: WireValue) -> Option<WireValue> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<WireValue> {
        self.0.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_object(&self) -> &WireObject {
        &self.0
    }
}

impl From<WireObject> for AdditionalFields {
    fn from(object: WireObject) -> Self {
        Self(object)
    }
}

/// A model that keeps keys it does not declare.
pub trait OpenModel: Model {
    fn additional(&self) -> &AdditionalFields;

    fn additional_mut(&mut self) -> &mut AdditionalFields;

    fn get(&self, key: &str) -> Option<&WireValue> {
        self.additional().get(key)
    }

    fn set(&mut self, key: impl Into<String>, value: WireValue) -> Option<WireValue> {
        self.additional_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Option<WireValue> {
        self.additional_mut().remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.additional().contains(key)
    }

    fn keys(&self) -> Vec<String> {
        self.additional().keys().map(str::to_string).collect()
    }
}

/// Declare a wire model.
///
/// Each field is written `name: Type => "wireName"`. A closed model ignores
/// unknown keys on decode. Ending the field list with `; extra <field>` makes
/// the model open: unknown keys are kept in that [`AdditionalFields`] field
/// and written back on encode, under the declared fields.
///
/// ```
/// use kmem_core::{wire_model, Model, Optional};
///
/// wire_model! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct Example {
///         pub document_id: Optional<String> => "documentId",
///     }
/// }
///
/// let decoded = Example::decode(serde_json::json!({"documentId": "d1"})).unwrap();
/// assert_eq!(decoded.document_id, Optional::Present("d1".to_string()));
/// assert_eq!(Example::wire_name("document_id"), Some("documentId"));
/// ```
#[macro_export]
macro_rules! wire_model {
    (@codec $name:ident) => {
        impl $crate::codec::WireCodec for $name {
            fn to_wire(&self) -> $crate::wire::WireValue {
                <Self as $crate::model::Model>::encode(self)
            }

            fn from_wire(value: $crate::wire::WireValue) -> $crate::error::Result<Self> {
                <Self as $crate::model::Model>::decode(value)
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                $crate::serde::Serialize::serialize(
                    &<Self as $crate::model::Model>::encode(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                let value: $crate::wire::WireValue =
                    $crate::serde::Deserialize::deserialize(deserializer)?;
                <Self as $crate::model::Model>::decode(value)
                    .map_err(<D::Error as $crate::serde::de::Error>::custom)
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )*
        }

        impl $crate::model::Model for $name {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [$crate::codec::FieldName] = &[
                $( $crate::codec::FieldName::new(stringify!($field), $wire), )*
            ];

            fn encode(&self) -> $crate::wire::WireValue {
                let mut writer = $crate::codec::ObjectWriter::new();
                $( writer.field($wire, &self.$field); )*
                writer.finish()
            }

            fn decode(value: $crate::wire::WireValue) -> $crate::error::Result<Self> {
                #[allow(unused_mut)]
                let mut reader = $crate::codec::ObjectReader::new(
                    <Self as $crate::model::Model>::NAME,
                    value,
                )?;
                Ok(Self { $( $field: reader.field($wire)?, )* })
            }
        }

        $crate::wire_model!(@codec $name);
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
            ; extra $extra:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )*
            /// Keys not declared by this model.
            pub $extra: $crate::model::AdditionalFields,
        }

        impl $crate::model::Model for $name {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [$crate::codec::FieldName] = &[
                $( $crate::codec::FieldName::new(stringify!($field), $wire), )*
            ];

            fn encode(&self) -> $crate::wire::WireValue {
                #[allow(unused_mut)]
                let mut writer = $crate::codec::ObjectWriter::with_captured(self.$extra.as_object());
                $( writer.field($wire, &self.$field); )*
                writer.finish()
            }

            fn decode(value: $crate::wire::WireValue) -> $crate::error::Result<Self> {
                #[allow(unused_mut)]
                let mut reader = $crate::codec::ObjectReader::new(
                    <Self as $crate::model::Model>::NAME,
                    value,
                )?;
                $( let $field = reader.field($wire)?; )*
                Ok(Self {
                    $( $field, )*
                    $extra: $crate::model::AdditionalFields::from(reader.into_remainder()),
                })
            }
        }

        impl $crate::model::OpenModel for $name {
            fn additional(&self) -> &$crate::model::AdditionalFields {
                &self.$extra
            }

            fn additional_mut(&mut self) -> &mut $crate::model::AdditionalFields {
                &mut self.$extra
            }
        }

        $crate::wire_model!(@codec $name);
    };


}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::optional::Optional;
    use serde_json::json;

    crate::wire_model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Closed {
            name: String => "name",
            document_id: Optional<String> => "documentId",
        }
    }

    crate::wire_model! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Open {
            title: Optional<String> => "title",
            ; extra rest
        }
    }

    #[test]
    fn test_closed_model_ignores_unknown_keys() {
        let decoded = Closed::decode(json!({"name": "n", "other": 1})).unwrap();
        assert_eq!(decoded.document_id, Optional::Absent);
        assert_eq!(decoded.encode(), json!({"name": "n"}));
    }

    #[test]
    fn test_required_field_error_names_model() {
        let err = Closed::decode(json!({"documentId": "d"})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingRequiredField {
                model: "Closed",
                field: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_non_object_is_invalid_type() {
        let err = Closed::decode(json!("x")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidType { expected: "object", .. }));
    }

    #[test]
    fn test_name_mapping_both_directions() {
        assert_eq!(Closed::FIELDS.len(), 2);
        assert_eq!(Closed::wire_name("document_id"), Some("documentId"));
        assert_eq!(Closed::ident_for("documentId"), Some("document_id"));
        assert_eq!(Closed::ident_for("document_id"), None);
    }

    #[test]
    fn test_open_model_captures_and_reemits() {
        let mut decoded = Open::decode(json!({"title": "t", "a": 1, "b": [true]})).unwrap();
        assert_eq!(decoded.keys(), vec!["a".to_string(), "b".to_string()]);
        assert!(!decoded.contains("title"));
        assert_eq!(decoded.get("a"), Some(&json!(1)));

        decoded.set("c", json!("new"));
        assert_eq!(decoded.remove("b"), Some(json!([true])));
        assert_eq!(decoded.encode(), json!({"title": "t", "a": 1, "c": "new"}));
    }

    #[test]
    fn test_open_model_declared_field_wins() {
        let mut model = Open {
            title: Optional::Present("declared".to_string()),
            ..Default::default()
        };
        model.set("title", json!("captured"));
        assert_eq!(model.encode(), json!({"title": "declared"}));
    }

    #[test]
    fn test_json_string_helpers() {
        let model = Closed {
            name: "n".to_string(),
            document_id: Optional::Null,
        };
        let text = model.to_json_string();
        assert_eq!(text, r#"{"name":"n","documentId":null}"#);
        assert_eq!(Closed::from_json_slice(text.as_bytes()).unwrap(), model);
    }

    #[test]
    fn test_serde_goes_through_wire_encoding() {
        let model = Closed {
            name: "n".to_string(),
            document_id: Optional::Absent,
        };
        assert_eq!(serde_json::to_value(&model).unwrap(), json!({"name": "n"}));

        let back: Closed = serde_json::from_value(json!({"name": "n"})).unwrap();
        assert_eq!(back, model);

        let err = serde_json::from_value::<Closed>(json!({})).unwrap_err();
        assert!(err.to_string().contains("Missing required field"));
    }
}
