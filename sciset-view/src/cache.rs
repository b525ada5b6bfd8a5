//! Cache of values derived from a dataset's contents.
//!
//! Entries are keyed by name (`"max"`, `"hash"`, or collaborator keys such
//! as `"stats=0"`) and tagged with the buffer generation they were computed
//! at. A lookup at a different generation misses and drops the entry.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

struct Entry {
    generation: u64,
    value: Arc<dyn Any + Send + Sync>,
}

/// Per-handle derived-value cache.
#[derive(Default)]
pub struct StoredValues {
    entries: Mutex<HashMap<String, Entry>>,
}

impl StoredValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key` if it was computed at `generation`.
    pub fn get<V>(&self, key: &str, generation: u64) -> Option<V>
    where
        V: Any + Clone + Send + Sync,
    {
        let mut entries = self.entries.lock();
        let stale = match entries.get(key) {
            Some(e) if e.generation == generation => return e.value.downcast_ref::<V>().cloned(),
            Some(_) => true,
            None => false,
        };
        if stale {
            entries.remove(key);
        }
        None
    }

    pub fn insert<V>(&self, key: impl Into<String>, generation: u64, value: V)
    where
        V: Any + Send + Sync,
    {
        self.entries.lock().insert(
            key.into(),
            Entry {
                generation,
                value: Arc::new(value),
            },
        );
    }

    /// Return the cached value or compute and store it.
    ///
    /// `f` runs without the cache lock held, so it may consult the cache
    /// itself.
    pub fn get_or_insert_with<V, F>(&self, key: &str, generation: u64, f: F) -> V
    where
        V: Any + Clone + Send + Sync,
        F: FnOnce() -> V,
    {
        if let Some(v) = self.get(key, generation) {
            return v;
        }
        let v = f();
        self.insert(key, generation, v.clone());
        v
    }

    /// Fallible form of [`get_or_insert_with`](Self::get_or_insert_with);
    /// errors are not cached.
    pub fn try_get_or_insert_with<V, E, F>(&self, key: &str, generation: u64, f: F) -> Result<V, E>
    where
        V: Any + Clone + Send + Sync,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(v) = self.get(key, generation) {
            return Ok(v);
        }
        let v = f()?;
        self.insert(key, generation, v.clone());
        Ok(v)
    }

    pub fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Entries held, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A copy starts with an empty cache.
impl Clone for StoredValues {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for StoredValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_struct("StoredValues").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_at_same_generation() {
        let c = StoredValues::new();
        c.insert("max", 3, 7.5f64);
        assert_eq!(c.get::<f64>("max", 3), Some(7.5));
    }

    #[test]
    fn test_stale_entry_is_dropped() {
        let c = StoredValues::new();
        c.insert("max", 3, 7.5f64);
        assert_eq!(c.get::<f64>("max", 4), None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_wrong_type_misses() {
        let c = StoredValues::new();
        c.insert("hash", 1, 9u64);
        assert_eq!(c.get::<i32>("hash", 1), None);
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let c = StoredValues::new();
        let mut calls = 0;
        for _ in 0..3 {
            let v = c.get_or_insert_with("stats=0", 2, || {
                calls += 1;
                vec![1, 2, 3]
            });
            assert_eq!(v, vec![1, 2, 3]);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let c = StoredValues::new();
        let r: Result<i32, &str> = c.try_get_or_insert_with("k", 1, || Err("boom"));
        assert!(r.is_err());
        assert!(c.is_empty());
        let r: Result<i32, &str> = c.try_get_or_insert_with("k", 1, || Ok(5));
        assert_eq!(r, Ok(5));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_clone_is_empty() {
        let c = StoredValues::new();
        c.insert("a", 1, 1u8);
        assert!(c.clone().is_empty());
        c.clear();
        assert!(c.is_empty());
    }
}
