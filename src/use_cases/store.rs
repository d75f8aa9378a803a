// Concurrent keyed store shared by the worker loops and per-player tasks.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::hash::Hash;

/// Sharded map with per-key atomic operations.
///
/// Values are cloned out; no guard ever leaves this type, so callers can hold
/// results across `.await` points without blocking other keys.
#[derive(Debug)]
pub struct KeyedStore<K, V>
where
    K: Eq + Hash,
{
    inner: DashMap<K, V>,
}

impl<K, V> Default for KeyedStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }
}

impl<K, V> KeyedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    /// Inserts only when the key is vacant; returns true if this call inserted.
    pub fn insert_if_absent(&self, key: K, value: V) -> bool {
        match self.inner.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.remove(key).map(|(_, value)| value)
    }

    /// Removes the entry only if the predicate holds for its current value.
    pub fn remove_if(&self, key: &K, predicate: impl FnOnce(&V) -> bool) -> Option<V> {
        self.inner
            .remove_if(key, |_, value| predicate(value))
            .map(|(_, value)| value)
    }

    /// Read-modify-write of a single key under its shard lock.
    ///
    /// `f` receives the current value (if any) and returns the next value
    /// (`None` deletes) together with a result handed back to the caller.
    pub fn compute<R>(&self, key: K, f: impl FnOnce(Option<&V>) -> (Option<V>, R)) -> R {
        match self.inner.entry(key) {
            Entry::Occupied(mut entry) => {
                let (next, result) = f(Some(entry.get()));
                match next {
                    Some(value) => {
                        entry.insert(value);
                    }
                    None => {
                        entry.remove();
                    }
                }
                result
            }
            Entry::Vacant(entry) => {
                let (next, result) = f(None);
                if let Some(value) = next {
                    entry.insert(value);
                }
                result
            }
        }
    }

    /// Point-in-time copy of all entries, for snapshot-then-act iteration.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn retain(&self, mut keep: impl FnMut(&K, &V) -> bool) {
        self.inner.retain(|key, value| keep(key, value));
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
