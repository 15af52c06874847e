//! Decoded records
//!
//! Key/value pairs decoded from a response body.

use std::collections::HashMap;

/// Mapping decoded from a response body
///
/// Keeps first-seen order; a repeated key overwrites the earlier value in
/// place. A value is `None` when its line carried no tab.
///
/// Keys are text. Key bytes that are not valid UTF-8 after unescaping are
/// replaced with U+FFFD, so such keys do not survive a round trip; values
/// are kept as raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Option<Vec<u8>>)>,
    index: HashMap<String, usize>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, last write wins
    pub fn insert(&mut self, key: String, value: Option<Vec<u8>>) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Value for `key`; `None` for both missing keys and absent values
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.index
            .get(key)
            .and_then(|&pos| self.entries[pos].1.as_deref())
    }

    /// Value for `key` as text, if present and valid UTF-8
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// True if the key appeared in the body, even without a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterate pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[u8]>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Iterate keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (String, Option<Vec<u8>>);
    type IntoIter = std::vec::IntoIter<(String, Option<Vec<u8>>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
