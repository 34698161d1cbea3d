use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::Variant;

/// Ordered property name → value mapping, supplied anew by the host on every pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    entries: IndexMap<Arc<str>, Variant>,
}

impl PropertyBag {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<Variant>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces `key`. Replacing keeps the key's original position.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<Variant>) -> Option<Variant> {
        self.entries
            .insert(Arc::<str>::from(key.as_ref()), value.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Variant> {
        self.entries.shift_remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Copies every entry of `other` over this bag, `other` winning on conflicts.
    pub fn merged(&self, other: &PropertyBag) -> PropertyBag {
        let mut out = self.clone();
        for (key, value) in other.entries.iter() {
            out.entries.insert(key.clone(), value.clone());
        }
        out
    }

    /// Builds a bag from a JSON object. Returns `None` for any other JSON value.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let object = value.as_object()?;
        let entries = object
            .iter()
            .map(|(k, v)| (Arc::<str>::from(k.as_str()), Variant::from_json_value(v)))
            .collect();
        Some(Self { entries })
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_json_value()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: Into<Variant>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (key, value) in iter {
            bag.set(key, value);
        }
        bag
    }
}
