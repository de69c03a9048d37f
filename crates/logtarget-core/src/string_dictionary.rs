//! String-valued view over an object-valued property map.
//!
//! Telemetry backends only accept string properties, while events carry
//! arbitrary JSON values. [`StringDictionary`] adapts one to the other
//! without copying: reads convert on the fly, writes store strings.
//!
//! Conversion is lossy and never fails:
//!
//! - strings are returned as-is
//! - `null` becomes `""`
//! - everything else uses its JSON text (`1`, `true`, `[1,2]`)
//!
//! The one exception is [`StringDictionary::get`], which reports a
//! `null`-assigned value as `Some(None)` rather than `Some(Some(""))`.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// Convert a property value to its string form.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A string-valued view over a `serde_json` map.
///
/// Read access works for any `M` that dereferences to the map (`&Map`,
/// `&mut Map`, `Box<Map>`); mutation additionally needs `DerefMut`.
#[derive(Debug, Clone)]
pub struct StringDictionary<M> {
    inner: M,
}

impl<M> StringDictionary<M>
where
    M: Deref<Target = Map<String, Value>>,
{
    /// Wrap a map.
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying map.
    pub fn into_inner(self) -> M {
        self.inner
    }

    /// Indexed lookup.
    ///
    /// `None` when the key is absent, `Some(None)` when it holds `null`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        self.inner.get(key).map(|value| match value {
            Value::Null => None,
            other => Some(value_to_string(other)),
        })
    }

    /// Lookup that maps `null` to `""`.
    #[must_use]
    pub fn try_get_value(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(value_to_string)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Whether `key` is present and holds exactly the string `value`.
    ///
    /// A stored non-string value never matches, even if its text form does.
    #[must_use]
    pub fn contains(&self, key: &str, value: &str) -> bool {
        matches!(self.inner.get(key), Some(Value::String(s)) if s == value)
    }

    /// Keys in map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Converted values in map order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.inner.values().map(value_to_string).collect()
    }

    /// Converted entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> {
        self.inner
            .iter()
            .map(|(key, value)| (key.as_str(), value_to_string(value)))
    }
}

impl<M> StringDictionary<M>
where
    M: DerefMut<Target = Map<String, Value>>,
{
    /// Store a value, replacing any previous one. `None` stores `null`.
    pub fn set(&mut self, key: impl Into<String>, value: Option<&str>) {
        let value = value.map_or(Value::Null, |v| Value::String(v.to_owned()));
        self.inner.insert(key.into(), value);
    }

    /// Add a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateKey`] if the key already exists.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> CoreResult<()> {
        let key = key.into();
        if self.inner.contains_key(&key) {
            return Err(CoreError::DuplicateKey(key));
        }
        self.inner.insert(key, Value::String(value.into()));
        Ok(())
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.inner.shift_remove(key).is_some()
    }

    /// Remove `key` only if it holds exactly the string `value`.
    pub fn remove_entry(&mut self, key: &str, value: &str) -> bool {
        if self.contains(key, value) {
            self.inner.shift_remove(key);
            true
        } else {
            false
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
