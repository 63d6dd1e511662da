//! Bounded map with least-recently-used eviction.
//!
//! Explicit capacity + access-order tracking instead of a platform cache
//! class, so eviction is observable: `insert` and `set_capacity` return
//! the evicted entries and the owner reacts (statistics, persistence).
//! Expected capacities are small (default 50), so the O(n) order updates
//! are irrelevant.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A bounded map evicting the least-recently-used entry on overflow.
///
/// "Used" means touched by [`get`](LruMap::get) or inserted; iteration and
/// read-only views do not affect recency.
pub struct LruMap<K, V> {
    entries: HashMap<K, V>,
    // Front = least recently used, back = most recently used.
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> LruMap<K, V> {
    /// Create an empty map. Capacity 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a value, marking the entry as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&mut V> {
        if self.entries.contains_key(key) {
            self.touch(key);
        }
        self.entries.get_mut(key)
    }

    /// Look up without affecting recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or overwrite, returning the evicted LRU entry if the insert
    /// pushed the map over capacity.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.entries.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return None;
        }
        self.order.push_back(key);
        if self.entries.len() > self.capacity {
            self.pop_lru()
        } else {
            None
        }
    }

    /// Remove an entry by key.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Change the capacity, evicting LRU entries until the map fits.
    /// Returns the evicted entries, LRU first.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<(K, V)> {
        self.capacity = capacity.max(1);
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(entry) = self.pop_lru() {
                evicted.push(entry);
            }
        }
        evicted
    }

    /// Remove every entry for which the predicate returns true, in
    /// unspecified order. Returns the removed entries.
    pub fn drain_filter(&mut self, mut pred: impl FnMut(&K, &V) -> bool) -> Vec<(K, V)> {
        let doomed: Vec<K> = self
            .entries
            .iter()
            .filter(|(k, v)| pred(k, v))
            .map(|(k, _)| k.clone())
            .collect();
        doomed
            .into_iter()
            .filter_map(|k| self.remove(&k).map(|v| (k, v)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Iterate entries in unspecified order, without affecting recency.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Iterate entries least-recently-used first, without affecting
    /// recency. Reinserting the yielded entries into an empty map in this
    /// sequence reconstructs the same eviction order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get_key_value(k))
    }

    fn touch(&mut self, key: &K) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.clone());
    }

    fn pop_lru(&mut self) -> Option<(K, V)> {
        let key = self.order.pop_front()?;
        let value = self.entries.remove(&key)?;
        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_within_capacity_never_evicts() {
        let mut map = LruMap::new(3);
        assert!(map.insert("a", 1).is_none());
        assert!(map.insert("b", 2).is_none());
        assert!(map.insert("c", 3).is_none());
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn overflow_evicts_least_recently_used() {
        let mut map = LruMap::new(2);
        map.insert("a", 1);
        map.insert("b", 2);
        let evicted = map.insert("c", 3);
        assert_eq!(evicted, Some(("a", 1)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn get_refreshes_recency() {
        let mut map = LruMap::new(2);
        map.insert("a", 1);
        map.insert("b", 2);
        map.get(&"a");
        // "b" is now LRU
        let evicted = map.insert("c", 3);
        assert_eq!(evicted, Some(("b", 2)));
        assert!(map.peek(&"a").is_some());
    }

    #[test]
    fn overwrite_does_not_evict() {
        let mut map = LruMap::new(2);
        map.insert("a", 1);
        map.insert("b", 2);
        assert!(map.insert("a", 10).is_none());
        assert_eq!(map.peek(&"a"), Some(&10));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn shrink_evicts_lru_first() {
        let mut map = LruMap::new(3);
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        map.get(&"a");
        let evicted = map.set_capacity(1);
        assert_eq!(evicted, vec![("b", 2), ("c", 3)]);
        assert!(map.peek(&"a").is_some());
    }

    #[test]
    fn drain_filter_removes_matches() {
        let mut map = LruMap::new(4);
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        let removed = map.drain_filter(|_, v| *v > 1);
        assert_eq!(removed.len(), 2);
        assert_eq!(map.len(), 1);
        assert!(map.peek(&"a").is_some());
    }

    #[test]
    fn iter_ordered_yields_lru_first() {
        let mut map = LruMap::new(3);
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        map.get(&"a");
        let keys: Vec<_> = map.iter_ordered().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);

        // Replaying that sequence into a fresh map reproduces the order.
        let mut replayed = LruMap::new(3);
        for (k, v) in map.iter_ordered() {
            replayed.insert(*k, *v);
        }
        assert_eq!(replayed.insert("d", 4), Some(("b", 2)));
    }

    #[test]
    fn zero_capacity_clamped() {
        let mut map = LruMap::new(0);
        assert!(map.insert("a", 1).is_none());
        assert_eq!(map.capacity(), 1);
    }
}
