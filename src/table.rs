#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::Value;
use foldhash::HashMap;

type TableEntry = (String, Value);

/// Tables with at least this many entries use the hash index for lookups.
const INDEXED_TABLE_THRESHOLD: usize = 6;

/// A TOML table: unique keys mapped to values, in insertion order.
///
/// A `Table` is the value returned by [`parse`](crate::parse) and is also the
/// value inside any `[section]`, `[[array.of.tables]]` entry, or inline
/// `{ ... }` table.
///
/// Small tables are scanned linearly. Once a table reaches a handful of
/// entries a `foldhash` index from key to position is built and kept up to
/// date on insertion.
///
/// Two tables compare equal when they hold the same keys with equal values,
/// regardless of order.
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<TableEntry>,
    index: Option<HashMap<String, usize>>,
}

impl Table {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: None,
        }
    }

    /// Inserts a key-value pair, returning the previous value for `key`.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Some(idx) = self.find_index(&key) {
            return Some(std::mem::replace(&mut self.entries[idx].1, value));
        }
        self.push_unchecked(key, value);
        None
    }

    /// Appends an entry the caller knows to be absent.
    pub(crate) fn push_unchecked(&mut self, key: String, value: Value) {
        let idx = self.entries.len();
        if let Some(index) = &mut self.index {
            index.insert(key.clone(), idx);
        }
        self.entries.push((key, value));
        if self.index.is_none() && self.entries.len() >= INDEXED_TABLE_THRESHOLD {
            self.bulk_index();
        }
    }

    fn bulk_index(&mut self) {
        let mut index = HashMap::default();
        index.reserve(self.entries.len());
        for (i, (key, _)) in self.entries.iter().enumerate() {
            index.insert(key.clone(), i);
        }
        self.index = Some(index);
    }

    fn find_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = &self.index {
            return index.get(name).copied();
        }
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.find_index(name) {
            Some(idx) => Some(&self.entries[idx].1),
            None => None,
        }
    }

    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self.find_index(name) {
            Some(idx) => Some(&mut self.entries[idx].1),
            None => None,
        }
    }

    /// Returns both key and value references.
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &Value)> {
        match self.find_index(name) {
            Some(idx) => {
                let (key, value) = &self.entries[idx];
                Some((key.as_str(), value))
            }
            None => None,
        }
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Returns a slice of all entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Value> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.entries {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Table) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl std::ops::Index<&str> for Table {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if `index` is not a key of the table. Use [`Table::get`] for a
    /// non-panicking lookup.
    #[inline]
    fn index(&self, index: &str) -> &Value {
        match self.get(index) {
            Some(value) => value,
            None => panic!("no entry found for key `{index}`"),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl IntoIterator for Table {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
