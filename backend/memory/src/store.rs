use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Key that asks for a fresh, time-derived key instead of a literal one.
pub const TIME_KEY: &str = "$time";

/// Abstract interface for the agent's key-value memory.
pub trait MemoryStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Insert or replace a value, returning the previous one.
    fn set(&self, key: &str, value: &str) -> Option<String>;

    /// Remove a key, returning its value if it existed.
    fn remove(&self, key: &str) -> Option<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys in sorted order.
    fn keys(&self) -> Vec<String>;

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plain in-process map. The lock only exists to make the store `Sync`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Option<String> {
        debug!(key, "memory set");
        self.write().insert(key.to_string(), value.to_string())
    }

    fn remove(&self, key: &str) -> Option<String> {
        debug!(key, "memory remove");
        self.write().remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

/// Build a key of the form `_<seconds>.<micros>` from `now` that is not yet
/// present in `store`. Collisions within the same microsecond get a `-N` suffix.
pub fn timestamp_key(store: &dyn MemoryStore, now: DateTime<Utc>) -> String {
    let base = format!("_{}.{:06}", now.timestamp(), now.timestamp_subsec_micros());
    if !store.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !store.contains(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn set_overwrites_and_returns_previous() {
        let store = InMemoryStore::new();
        assert_eq!(store.set("goal", "first"), None);
        assert_eq!(store.set("goal", "second").as_deref(), Some("first"));
        assert_eq!(store.get("goal").as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_missing_key_is_none() {
        let store = InMemoryStore::new();
        store.set("a", "1");
        assert_eq!(store.remove("b"), None);
        assert_eq!(store.keys(), vec!["a".to_string()]);
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryStore::new();
        store.set("zeta", "z");
        store.set("alpha", "a");
        assert_eq!(store.keys(), vec!["alpha".to_string(), "zeta".to_string()]);
        assert!(!store.is_empty());
    }

    #[test]
    fn timestamp_key_format() {
        let store = InMemoryStore::new();
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        assert_eq!(timestamp_key(&store, now), "_1700000000.123456");
    }

    #[test]
    fn timestamp_key_skips_taken_keys() {
        let store = InMemoryStore::new();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let first = timestamp_key(&store, now);
        store.set(&first, "one");
        let second = timestamp_key(&store, now);
        store.set(&second, "two");
        let third = timestamp_key(&store, now);
        assert_eq!(second, format!("{first}-1"));
        assert_eq!(third, format!("{first}-2"));
    }
}
