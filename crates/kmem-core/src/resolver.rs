//! Polymorphic field resolution.
//!
//! Some service fields can carry one of several shapes. A [`Resolver`] tries
//! a fixed, caller-declared list of candidates in order and keeps the first
//! one that decodes. When none does the raw wire value is kept, so resolution
//! itself never fails.

use std::fmt;

use tracing::trace;

use crate::codec::WireCodec;
use crate::error::Result;
use crate::wire::{kind_name, WireValue};

type Attempt<T> = Box<dyn Fn(WireValue) -> Result<T> + Send + Sync>;

/// Result of resolving a polymorphic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// A candidate decoded the value.
    Matched { candidate: &'static str, value: T },
    /// No candidate matched; the value is kept as-is.
    Raw(WireValue),
    /// No candidate matched a `null`.
    Null,
}

impl<T> Resolution<T> {
    /// Label of the winning candidate.
    pub fn candidate(&self) -> Option<&'static str> {
        match self {
            Resolution::Matched { candidate, .. } => Some(candidate),
            _ => None,
        }
    }
}

/// Ordered list of labelled decode attempts.
pub struct Resolver<T> {
    name: &'static str,
    candidates: Vec<(&'static str, Attempt<T>)>,
}

impl<T: 'static> Resolver<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            candidates: Vec::new(),
        }
    }

    /// Append a candidate with a custom attempt.
    pub fn candidate<F>(mut self, label: &'static str, attempt: F) -> Self
    where
        F: Fn(WireValue) -> Result<T> + Send + Sync + 'static,
    {
        self.candidates.push((label, Box::new(attempt)));
        self
    }

    /// Append a candidate that decodes as `S` and wraps the result.
    pub fn shape<S: WireCodec + 'static>(self, label: &'static str, wrap: fn(S) -> T) -> Self {
        self.candidate(label, move |value| S::from_wire(value).map(wrap))
    }

    /// Append a list candidate. It matches only if every element decodes.
    pub fn list_of<S: WireCodec + 'static>(self, label: &'static str, wrap: fn(Vec<S>) -> T) -> Self {
        self.shape::<Vec<S>>(label, wrap)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.candidates.iter().map(|(label, _)| *label).collect()
    }

    /// Try each candidate in declaration order.
    pub fn resolve(&self, value: WireValue) -> Resolution<T> {
        for &(label, ref attempt) in &self.candidates {
            match attempt(value.clone()) {
                Ok(decoded) => {
                    return Resolution::Matched {
                        candidate: label,
                        value: decoded,
                    }
                }
                Err(e) => {
                    trace!(resolver = self.name, candidate = label, reason = %e, "Candidate rejected");
                }
            }
        }

        if value.is_null() {
            Resolution::Null
        } else {
            trace!(resolver = self.name, kind = kind_name(&value), "Keeping raw value");
            Resolution::Raw(value)
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.candidates.iter().map(|(label, _)| *label).collect();
        f.debug_struct("Resolver")
            .field("name", &self.name)
            .field("candidates", &labels)
            .finish()
    }
}

/// A closed set of shapes decoded through a resolver.
///
/// Implementors declare their candidates once and a fallback variant for
/// values no candidate accepts; [`resolve_polymorphic`] does the rest.
pub trait Polymorphic: Sized + 'static {
    fn resolver() -> Resolver<Self>;

    /// Variant used when no candidate matches (including `null`).
    fn fallback(value: WireValue) -> Self;
}

/// Decode a polymorphic value. Never fails.
pub fn resolve_polymorphic<P: Polymorphic>(value: WireValue) -> P {
    match P::resolver().resolve(value) {
        Resolution::Matched { value, .. } => value,
        Resolution::Raw(raw) => P::fallback(raw),
        Resolution::Null => P::fallback(WireValue::Null),
    }
}

/// A field that is either a decoded `T` or the raw wire value it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum OrRaw<T> {
    Typed(T),
    Raw(WireValue),
}

impl<T> OrRaw<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            OrRaw::Typed(value) => Some(value),
            OrRaw::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&WireValue> {
        match self {
            OrRaw::Raw(value) => Some(value),
            OrRaw::Typed(_) => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, OrRaw::Typed(_))
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            OrRaw::Typed(value) => Some(value),
            OrRaw::Raw(_) => None,
        }
    }
}

impl<T> From<T> for OrRaw<T> {
    fn from(value: T) -> Self {
        OrRaw::Typed(value)
    }
}

impl<T: WireCodec + 'static> Polymorphic for OrRaw<T> {
    fn resolver() -> Resolver<Self> {
        Resolver::new("OrRaw").shape::<T>("typed", OrRaw::Typed)
    }

    fn fallback(value: WireValue) -> Self {
        OrRaw::Raw(value)
    }
}

impl<T: WireCodec + 'static> WireCodec for OrRaw<T> {
    fn to_wire(&self) -> WireValue {
        match self {
            OrRaw::Typed(value) => value.to_wire(),
            OrRaw::Raw(value) => value.clone(),
        }
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        Ok(resolve_polymorphic(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Text(String),
        Number(f64),
        Integer(i64),
        Words(Vec<String>),
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    #[test]
    fn test_first_candidate_in_order_wins() {
        // 5 decodes as both number and integer; declaration order decides.
        let number_first = Resolver::new("shape")
            .shape::<f64>("number", Shape::Number)
            .shape::<i64>("integer", Shape::Integer);
        let integer_first = Resolver::new("shape")
            .shape::<i64>("integer", Shape::Integer)
            .shape::<f64>("number", Shape::Number);

        assert_eq!(
            number_first.resolve(json!(5)),
            Resolution::Matched {
                candidate: "number",
                value: Shape::Number(5.0)
            }
        );
        assert_eq!(
            integer_first.resolve(json!(5)),
            Resolution::Matched {
                candidate: "integer",
                value: Shape::Integer(5)
            }
        );
    }

    #[test]
    fn test_later_candidate_used_after_failure() {
        let resolver = Resolver::new("shape")
            .shape::<String>("text", Shape::Text)
            .list_of::<String>("words", Shape::Words);

        let resolved = resolver.resolve(json!(["a", "b"]));
        assert_eq!(resolved.candidate(), Some("words"));
    }

    #[test]
    fn test_list_candidate_requires_every_element() {
        let resolver = Resolver::new("shape").list_of::<String>("words", Shape::Words);
        assert_eq!(resolver.resolve(json!(["a", 1])), Resolution::Raw(json!(["a", 1])));
    }

    #[test]
    fn test_fallback_is_total() {
        init_tracing();
        let resolver = Resolver::new("shape").shape::<String>("text", Shape::Text);

        for value in [json!(true), json!(1), json!([]), json!({"k": "v"})] {
            assert_eq!(resolver.resolve(value.clone()), Resolution::Raw(value));
        }
        assert_eq!(resolver.resolve(json!(null)), Resolution::Null);
    }

    #[test]
    fn test_empty_resolver_keeps_raw() {
        let resolver: Resolver<Shape> = Resolver::new("none");
        assert!(resolver.labels().is_empty());
        assert_eq!(resolver.resolve(json!("x")), Resolution::Raw(json!("x")));
    }

    #[test]
    fn test_or_raw_decode_never_fails() {
        let typed = OrRaw::<Vec<String>>::from_wire(json!(["a"])).unwrap();
        assert_eq!(typed.typed(), Some(&vec!["a".to_string()]));

        let raw = OrRaw::<Vec<String>>::from_wire(json!({"a": 1})).unwrap();
        assert_eq!(raw.raw(), Some(&json!({"a": 1})));
        assert_eq!(raw.to_wire(), json!({"a": 1}));
    }

    #[test]
    fn test_debug_lists_labels() {
        let resolver = Resolver::new("shape")
            .shape::<String>("text", Shape::Text)
            .shape::<f64>("number", Shape::Number);
        assert_eq!(resolver.labels(), vec!["text", "number"]);
        assert!(format!("{:?}", resolver).contains("number"));
    }
}
