//! Insertion-ordered multimap from a key to a set of values.
//!
//! Used for filters grouped by dimension, havings grouped by metric, and
//! dimension field projections. A key is never mapped to an empty set.

use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::hash::Hash;
use std::sync::Arc;

/// A key that can be rendered by name when a grouping is serialized.
pub trait GroupKey {
    fn group_name(&self) -> &str;
}

impl<T: GroupKey + ?Sized> GroupKey for Arc<T> {
    fn group_name(&self) -> &str {
        (**self).group_name()
    }
}

impl GroupKey for super::Dimension {
    fn group_name(&self) -> &str {
        self.name()
    }
}

impl GroupKey for super::LogicalMetric {
    fn group_name(&self) -> &str {
        self.name()
    }
}

/// Ordered mapping from key to a non-empty set of values.
///
/// Keys keep first-insertion order; values within a key keep insertion order
/// but compare as a set.
#[derive(Debug, Clone)]
pub struct GroupedSet<K, V> {
    groups: IndexMap<K, IndexSet<V>>,
}

impl<K, V> GroupedSet<K, V>
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    /// Add `value` under `key`. Returns false if it was already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.groups.entry(key).or_default().insert(value)
    }

    /// Add every value under `key`. An empty iterator adds nothing.
    pub fn insert_all(&mut self, key: K, values: impl IntoIterator<Item = V>) {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return;
        }
        self.groups.entry(key).or_default().extend(values);
    }

    /// Union `other` into this grouping, key by key.
    ///
    /// Keys new to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: GroupedSet<K, V>) {
        for (key, values) in other.groups {
            self.insert_all(key, values);
        }
    }

    /// A new grouping holding the union of `self` and `other`.
    pub fn union(&self, other: &GroupedSet<K, V>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let mut merged = self.clone();
        merged.merge(other.clone());
        merged
    }

    pub fn get(&self, key: &K) -> Option<&IndexSet<V>> {
        self.groups.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.groups.contains_key(key)
    }

    /// Keep only the values matching `keep`, dropping keys left empty.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
        for (key, values) in self.groups.iter_mut() {
            values.retain(|value| keep(key, value));
        }
        self.groups.retain(|_, values| !values.is_empty());
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &IndexSet<V>)> {
        self.groups.iter()
    }

    /// Every value across all keys, in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.groups.values().flatten()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn value_count(&self) -> usize {
        self.groups.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Default for GroupedSet<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq for GroupedSet<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Eq for GroupedSet<K, V> {}

impl<K: Hash + Eq, V: Hash + Eq> FromIterator<(K, V)> for GroupedSet<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut grouped = Self::new();
        for (key, value) in iter {
            grouped.insert(key, value);
        }
        grouped
    }
}

impl<K, V> Serialize for GroupedSet<K, V>
where
    K: GroupKey,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, values) in &self.groups {
            map.serialize_entry(key.group_name(), values)?;
        }
        map.end()
    }
}
