use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use super::DEFAULT_CAPACITY;

/// A hash map behind a read-write lock. Every operation takes the lock for
/// its own duration only; values are cloned out rather than borrowed.
#[derive(Debug)]
pub struct SharedMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash, V> SharedMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity(DEFAULT_CAPACITY)),
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.write().unwrap().insert(key, value);
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().unwrap().remove(key)
    }

    /// Moves the value stored under `from` to `to`, displacing any value
    /// already there. Returns false if `from` was not present.
    pub fn rename(&self, from: &K, to: K) -> bool {
        let mut guard = self.inner.write().unwrap();
        match guard.remove(from) {
            Some(value) => {
                guard.insert(to, value);
                true
            }
            None => false,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().unwrap().contains_key(key)
    }

    pub fn clear(&self) {
        self.inner.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }

    /// Visits every entry under the read lock. Return false to stop early.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let guard = self.inner.read().unwrap();
        for (key, value) in guard.iter() {
            if !f(key, value) {
                break;
            }
        }
    }
}

impl<K: Eq + Hash, V: Clone> SharedMap<K, V> {
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.read().unwrap().get(key).cloned()
    }

    /// Returns the resident value for `key`, inserting `value` first if the
    /// key was vacant. The bool reports whether the insert happened.
    pub fn get_or_insert(&self, key: K, value: V) -> (V, bool) {
        let mut guard = self.inner.write().unwrap();
        match guard.get(&key) {
            Some(existing) => (existing.clone(), false),
            None => {
                guard.insert(key, value.clone());
                (value, true)
            }
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> SharedMap<K, V> {
    /// Returns a point-in-time copy of the whole map.
    pub fn snapshot(&self) -> HashMap<K, V> {
        self.inner.read().unwrap().clone()
    }
}

impl<K: Eq + Hash, V> Default for SharedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
