//! Ordered, key-deduplicated log fields.
//!
//! [`Fields`] is a value type: merging and appending return new collections,
//! so a snapshot handed to a [`Logger`](super::Logger) is unaffected by what
//! the reporter does afterwards.
//!
//! On key collision the newer value wins and the key keeps the position it
//! was first inserted at.

use crate::context::Context;
use crate::error::FieldsError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// Builds [`Fields`] from `key => value` pairs.
///
/// Values may be any `Serialize` expression. Pairs are checked at compile
/// time, so an odd literal cannot be written.
///
/// ```rust,ignore
/// let fields = fields! {
///     "user.id" => 42,
///     "user.name" => "ada",
/// };
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::logging::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::logging::Fields::new();
        $( fields.insert($key, $crate::__private::json!($value)); )+
        fields
    }};
}

/// Ordered key/value metadata attached to log lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builds fields from a flattened `[k1, v1, k2, v2, ...]` sequence.
    ///
    /// # Errors
    ///
    /// Returns [`FieldsError::OddLength`] when the sequence has a trailing key
    /// and [`FieldsError::NonStringKey`] when a key position is not a string.
    pub fn try_from_flat(flat: Vec<Value>) -> Result<Self, FieldsError> {
        if flat.len() % 2 != 0 {
            return Err(FieldsError::OddLength(flat.len()));
        }

        let mut fields = Self::with_capacity(flat.len() / 2);
        let mut iter = flat.into_iter().enumerate();
        while let (Some((index, key)), Some((_, value))) = (iter.next(), iter.next()) {
            match key {
                Value::String(key) => fields.insert(key, value),
                _ => return Err(FieldsError::NonStringKey { index }),
            }
        }
        Ok(fields)
    }

    /// Flattens into the `[k1, v1, k2, v2, ...]` form some backends expect.
    pub fn flatten(&self) -> Vec<Value> {
        self.entries
            .iter()
            .flat_map(|(k, v)| [Value::String(k.clone()), v.clone()])
            .collect()
    }

    /// Sets a field in place. An existing key is overwritten where it stands.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use = "This method returns a new Fields and does not modify self"]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns a copy merged with `other`; keys from `other` win.
    #[must_use = "This method returns a new Fields and does not modify self"]
    pub fn with(&self, other: &Fields) -> Fields {
        let mut merged = Fields::with_capacity(self.len() + other.len());
        merged.entries.extend(self.entries.iter().cloned());
        for (k, v) in &other.entries {
            merged.insert(k.clone(), v.clone());
        }
        merged
    }

    /// Returns a copy extended with `pairs`; later pairs win.
    #[must_use = "This method returns a new Fields and does not modify self"]
    pub fn append<K, V, I>(&self, pairs: I) -> Fields
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut appended = self.clone();
        for (k, v) in pairs {
            appended.insert(k, v);
        }
        appended
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Borrowing iterator over [`Fields`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields::new().append(iter)
    }
}

impl TryFrom<Vec<Value>> for Fields {
    type Error = FieldsError;

    fn try_from(flat: Vec<Value>) -> Result<Self, Self::Error> {
        Self::try_from_flat(flat)
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match v {
                Value::String(s) => write!(f, "{}={}", k, s)?,
                other => write!(f, "{}={}", k, other)?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// Context Propagation
// =============================================================================

/// Returns a context carrying the existing ambient fields merged with `fields`.
///
/// Keys in `fields` win over ones already present.
pub fn inject_fields(ctx: &Context, fields: &Fields) -> Context {
    ctx.with_fields(ctx.fields().with(fields))
}

/// Single-pair form of [`inject_fields`].
pub fn inject_field(ctx: &Context, key: impl Into<String>, value: impl Into<Value>) -> Context {
    ctx.with_fields(ctx.fields().append([(key, value)]))
}

/// Returns the ambient fields carried by `ctx`, empty if none were injected.
pub fn extract_fields(ctx: &Context) -> Fields {
    ctx.fields().clone()
}
