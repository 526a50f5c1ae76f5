//! Per-value annotation sets.
//!
//! Annotations are free-form tags written before a value (`:tag value`).
//! They never become part of [`Value`](crate::Value): the decoder hands
//! them to the [`Cast`](crate::Cast) hook and the encoder collects them from
//! the [`ValueHook`](crate::ValueHook), one fresh set per value.
//!
//! The decoder also records the syntactic class of every literal using the
//! reserved tags below.
//!
//! ```text
//! port :u16 8080
//! tags :set ["a", "b"]
//! ```

use indexmap::IndexSet;

/// Integer literal (decimal, hexadecimal or octal).
pub const INT: &str = ".int";
/// Literal with a decimal point or an exponent.
pub const FLOAT: &str = ".float";
pub const BOOL: &str = ".bool";
pub const STRING: &str = ".string";
pub const LIST: &str = ".list";
pub const DICT: &str = ".dict";

/// An insertion-ordered set of distinct annotation tags.
///
/// # Examples
///
/// ```rust
/// use hipack::Annotations;
///
/// let mut annotations = Annotations::new();
/// assert!(annotations.insert("unit"));
/// assert!(!annotations.insert("unit"));
/// assert!(annotations.contains("unit"));
/// assert_eq!(annotations.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations(IndexSet<String>);

impl Annotations {
    #[must_use]
    pub fn new() -> Self {
        Annotations(IndexSet::new())
    }

    /// Adds a tag, returning `false` if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.shift_remove(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags in insertion order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Annotations {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Annotations(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let annotations: Annotations = ["b", "a", "c"].into_iter().collect();
        let tags: Vec<_> = annotations.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut annotations = Annotations::new();
        assert!(annotations.insert(INT));
        assert!(!annotations.insert(".int".to_string()));
        assert_eq!(annotations.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut annotations: Annotations = [FLOAT, "meters"].into_iter().collect();
        assert!(annotations.remove(FLOAT));
        assert!(!annotations.remove(FLOAT));
        assert!(!annotations.contains(FLOAT));
        assert!(annotations.contains("meters"));
        assert!(!annotations.is_empty());
    }
}
