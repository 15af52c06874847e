//! Parameter maps
//!
//! Ordered request fields. An absent value is kept in the map but never
//! reaches the wire: the server treats "absent" and "empty" differently.

use std::collections::HashMap;
use std::fmt;

/// Ordered mapping from field name to an optional value
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, Option<Vec<u8>>)>,
    index: HashMap<String, usize>,
}

impl ParameterMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Set a field, replacing an existing value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.insert_opt(name, Some(value.into()));
    }

    /// Set a field that may be absent
    pub fn insert_opt(&mut self, name: impl Into<String>, value: Option<Vec<u8>>) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`insert_opt`](Self::insert_opt)
    pub fn with_opt<V: Into<Vec<u8>>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(name, value.map(Into::into));
        self
    }

    /// Look up a field; `Some(None)` means present but absent-valued
    pub fn get(&self, name: &str) -> Option<Option<&[u8]>> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].1.as_deref())
    }

    /// Iterate fields in insertion order, absent values included
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[u8]>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Number of fields, absent values included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterMap
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParameterMap::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl fmt::Debug for ParameterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are logged, so render them as text
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(n, v)| (n, v.as_deref().map(String::from_utf8_lossy))),
            )
            .finish()
    }
}
