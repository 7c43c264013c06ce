//! Storage seam for the ledger tables.
//!
//! The ledger is agnostic to how records are persisted: anything with
//! `get`/`put`/`exists` semantics over a key/value table satisfies it. The
//! in-memory implementation below is the one production currently runs on;
//! tests get isolated instances for free.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// Key/value table abstraction for one ledger entity table.
pub trait KeyValueStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    fn exists(&self, key: &K) -> bool;
    fn list(&self) -> Vec<V>;
}

impl<K, V, S> KeyValueStore<K, V> for Arc<S>
where
    S: KeyValueStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn put(&self, key: K, value: V) {
        (**self).put(key, value)
    }

    fn exists(&self, key: &K) -> bool {
        (**self).exists(key)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }
}

/// In-memory table backed by a `RwLock<HashMap>`.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn put(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn exists(&self, key: &K) -> bool {
        match self.inner.read() {
            Ok(map) => map.contains_key(key),
            Err(_) => false,
        }
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let store: InMemoryStore<String, u32> = InMemoryStore::new();
        store.put("k".to_string(), 1);

        assert!(store.exists(&"k".to_string()));
        assert_eq!(store.get(&"k".to_string()), Some(1));
        assert_eq!(store.get(&"missing".to_string()), None);
    }

    #[test]
    fn put_overwrites_in_place() {
        let store: InMemoryStore<String, u32> = InMemoryStore::new();
        store.put("k".to_string(), 1);
        store.put("k".to_string(), 2);

        assert_eq!(store.get(&"k".to_string()), Some(2));
        assert_eq!(store.list().len(), 1);
    }
}
