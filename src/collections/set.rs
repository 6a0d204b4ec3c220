use std::collections::HashSet;
use std::hash::Hash;
use std::sync::RwLock;

use super::DEFAULT_CAPACITY;

/// A hash set behind a read-write lock, sharing the locking discipline of
/// [`SharedMap`](super::SharedMap).
#[derive(Debug)]
pub struct SharedSet<T> {
    inner: RwLock<HashSet<T>>,
}

impl<T: Eq + Hash> SharedSet<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashSet::with_capacity(DEFAULT_CAPACITY)),
        }
    }

    /// Adds a key. Returns false if it was already present.
    pub fn insert(&self, key: T) -> bool {
        self.inner.write().unwrap().insert(key)
    }

    pub fn contains(&self, key: &T) -> bool {
        self.inner.read().unwrap().contains(key)
    }

    /// Removes a key. Returns true if it was present.
    pub fn remove(&self, key: &T) -> bool {
        self.inner.write().unwrap().remove(key)
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

    /// Visits every key under the read lock. Return false to stop early.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let guard = self.inner.read().unwrap();
        for key in guard.iter() {
            if !f(key) {
                break;
            }
        }
    }
}

impl<T: Eq + Hash + Clone> SharedSet<T> {
    /// Returns all keys in no particular order.
    pub fn keys(&self) -> Vec<T> {
        self.inner.read().unwrap().iter().cloned().collect()
    }

    /// Returns a point-in-time copy of the whole set.
    pub fn snapshot(&self) -> HashSet<T> {
        self.inner.read().unwrap().clone()
    }
}

impl<T: Eq + Hash> Default for SharedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
