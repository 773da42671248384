//! Tags attached to documents, and filters built from them.

use std::collections::BTreeMap;

use crate::codec::WireCodec;
use crate::defaults::{BARE_TAG_VALUE, TAG_SEPARATOR};
use crate::error::Result;
use crate::resolver::{resolve_polymorphic, Polymorphic, Resolver};
use crate::wire::{expect_object, WireValue};

/// Value of a single tag key.
///
/// The service sends a list of nullable strings; older payloads and
/// hand-written requests sometimes use a bare string.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    List(Vec<Option<String>>),
    Text(String),
    Raw(WireValue),
}

impl TagValue {
    /// Non-null string values, in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            TagValue::List(items) => items.iter().flatten().map(String::as_str).collect(),
            TagValue::Text(text) => vec![text.as_str()],
            TagValue::Raw(_) => Vec::new(),
        }
    }
}

impl Polymorphic for TagValue {
    fn resolver() -> Resolver<Self> {
        Resolver::new("TagValue")
            .list_of::<Option<String>>("list", TagValue::List)
            .shape::<String>("text", TagValue::Text)
    }

    fn fallback(value: WireValue) -> Self {
        TagValue::Raw(value)
    }
}

impl WireCodec for TagValue {
    fn to_wire(&self) -> WireValue {
        match self {
            TagValue::List(items) => items.to_wire(),
            TagValue::Text(text) => text.to_wire(),
            TagValue::Raw(value) => value.clone(),
        }
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        Ok(resolve_polymorphic(value))
    }
}

/// Tag key to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCollection(BTreeMap<String, TagValue>);

impl TagCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, turning the entry into a list if needed.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = Some(value.into());
        let items = match self.0.remove(&key) {
            Some(TagValue::List(mut items)) => {
                items.push(value);
                items
            }
            Some(TagValue::Text(text)) => vec![Some(text), value],
            Some(TagValue::Raw(_)) | None => vec![value],
        };
        self.0.insert(key, TagValue::List(items));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) -> Option<TagValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every tag flattened to `key:value` strings, as upload forms expect.
    /// A null value is sent as the bare key.
    pub fn to_pairs(&self) -> Vec<String> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                TagValue::List(items) => {
                    for item in items {
                        pairs.push(match item {
                            Some(v) => format!("{}{}{}", key, TAG_SEPARATOR, v),
                            None => key.clone(),
                        });
                    }
                }
                TagValue::Text(text) => pairs.push(format!("{}{}{}", key, TAG_SEPARATOR, text)),
                TagValue::Raw(_) => {}
            }
        }
        pairs
    }
}

impl WireCodec for TagCollection {
    fn to_wire(&self) -> WireValue {
        self.0.to_wire()
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        let object = expect_object(value)?;
        Ok(Self(
            object
                .into_iter()
                .map(|(key, value)| (key, resolve_polymorphic(value)))
                .collect(),
        ))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagCollection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = TagCollection::new();
        for (key, value) in iter {
            tags.add(key, value);
        }
        tags
    }
}

/// Split `key:value` at the first separator. A bare key means `"true"`.
pub fn parse_tag(tag: &str) -> (String, String) {
    match tag.split_once(TAG_SEPARATOR) {
        Some((key, value)) => (key.to_string(), value.to_string()),
        None => (tag.to_string(), BARE_TAG_VALUE.to_string()),
    }
}

/// One filter group. Every tag in the group must match; a list of filters
/// matches when any group does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFilter(TagCollection);

impl MemoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required tag to this group.
    pub fn by_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.add(key, value);
        self
    }

    /// Alias for a `__document_id` tag match.
    pub fn by_document(self, document_id: impl Into<String>) -> Self {
        self.by_tag("__document_id", document_id)
    }

    /// One single-tag filter per value, so any matching tag is enough.
    pub fn from_tags(tags: &TagCollection) -> Vec<MemoryFilter> {
        tags.iter()
            .flat_map(|(key, value)| {
                value
                    .values()
                    .into_iter()
                    .map(move |v| MemoryFilter::new().by_tag(key, v))
            })
            .collect()
    }

    /// Filters from `key:value` strings, one group per string.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Vec<MemoryFilter> {
        pairs
            .into_iter()
            .map(|pair| {
                let (key, value) = parse_tag(pair);
                MemoryFilter::new().by_tag(key, value)
            })
            .collect()
    }

    pub fn tags(&self) -> &TagCollection {
        &self.0
    }
}

impl WireCodec for MemoryFilter {
    fn to_wire(&self) -> WireValue {
        self.0.to_wire()
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        TagCollection::from_wire(value).map(Self)
    }
}
