//! Ordered map type for HiPack dicts.
//!
//! [`Dict`] wraps an [`IndexMap`] so that decoded dicts keep the order in
//! which keys appeared in the text. The encoder does not depend on that
//! order: keys are always written in ascending order, which makes the output
//! canonical. Equality between two dicts ignores key order.
//!
//! ## Examples
//!
//! ```rust
//! use hipack::{Dict, Value};
//!
//! let mut dict = Dict::new();
//! dict.insert("name".to_string(), Value::from("Alice"));
//! dict.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(dict.len(), 2);
//! assert_eq!(dict.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// An insertion-ordered map of string keys to HiPack values.
///
/// # Examples
///
/// ```rust
/// use hipack::{Dict, Value};
///
/// let mut dict = Dict::new();
/// dict.insert("second".to_string(), Value::from(2));
/// dict.insert("first".to_string(), Value::from(1));
///
/// let keys: Vec<_> = dict.keys().cloned().collect();
/// assert_eq!(keys, vec!["second", "first"]);
/// assert_eq!(dict.sorted_keys(), vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict(IndexMap<String, Value>);

impl Dict {
    #[must_use]
    pub fn new() -> Self {
        Dict(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Dict(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the dict.
    ///
    /// An existing key keeps its position and has its value replaced; the
    /// old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hipack::{Dict, Value};
    ///
    /// let mut dict = Dict::new();
    /// assert!(dict.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(dict.insert("key".to_string(), Value::from(43)).is_some());
    /// assert_eq!(dict.get("key"), Some(&Value::from(43)));
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the dict, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the dict, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the dict, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Keys in ascending order, the order used by the encoder.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl From<HashMap<String, Value>> for Dict {
    fn from(map: HashMap<String, Value>) -> Self {
        Dict(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for Dict {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Dict(map.into_iter().collect())
    }
}

impl From<Dict> for HashMap<String, Value> {
    fn from(dict: Dict) -> Self {
        dict.0.into_iter().collect()
    }
}

impl IntoIterator for Dict {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Dict {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Dict(IndexMap::from_iter(iter))
    }
}
