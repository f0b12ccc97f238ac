//! Keyed export caches.
//!
//! Every cache lives for exactly one export run. Iteration order is
//! insertion order, which makes the emitted document stable across
//! identical runs; users diff the output, so this matters.

use std::collections::HashMap;
use std::hash::Hash;
use tracing::trace;

/// Insertion-ordered map with the `have`/`add`/`get` contract the export
/// components share. No eviction; growth is bounded by scene size.
#[derive(Debug, Clone)]
pub struct ExportCache<K, V> {
    label: &'static str,
    order: Vec<K>,
    map: HashMap<K, V>,
}

impl<K: Eq + Hash + Clone, V> ExportCache<K, V> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            order: Vec::new(),
            map: HashMap::new(),
        }
    }

    pub fn have(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or replace. A replaced key keeps its original position, so
    /// last-write-wins on the value never reorders the output.
    pub fn add(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push(key);
            trace!(cache = self.label, entries = self.order.len(), "cache insert");
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(move |k| (k, &self.map[k]))
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().map(move |k| &self.map[k])
    }
}
