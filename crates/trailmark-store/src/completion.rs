//! Per-route completion map with write-through persistence

use crate::error::StoreError;
use crate::storage::Storage;
use crate::transfer::coerce_map;
use std::collections::BTreeMap;
use std::sync::Arc;
use trailmark_model::CompletionLookup;

/// Storage key for a route's completion map
#[must_use]
pub fn completion_key(namespace: &str, route_id: &str) -> String {
    format!("{namespace}::{route_id}")
}

/// Completion flags for one route
///
/// Entries for ids that are not in the current document are kept as they are.
#[derive(Debug, Clone)]
pub struct CompletionStore {
    storage: Arc<dyn Storage>,
    route_id: String,
    key: String,
    map: BTreeMap<String, bool>,
}

impl CompletionStore {
    /// Load the map for `route_id`, empty when absent or unreadable
    ///
    /// # Errors
    /// Storage read failures.
    pub fn open(
        storage: Arc<dyn Storage>,
        namespace: &str,
        route_id: &str,
    ) -> Result<Self, StoreError> {
        let key = completion_key(namespace, route_id);
        let map = match storage.get(&key)? {
            None => BTreeMap::new(),
            Some(text) => serde_json::from_str(&text)
                .ok()
                .and_then(coerce_map)
                .unwrap_or_else(|| {
                    tracing::warn!(key = %key, "stored completion map is corrupt, starting empty");
                    BTreeMap::new()
                }),
        };
        tracing::debug!(route = route_id, entries = map.len(), "loaded completion map");
        Ok(Self {
            storage,
            route_id: route_id.to_string(),
            key,
            map,
        })
    }

    /// Route this map belongs to
    #[inline]
    #[must_use]
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    /// Whether `id` is marked complete
    #[must_use]
    pub fn is_complete(&self, id: &str) -> bool {
        self.map.get(id).copied().unwrap_or(false)
    }

    /// Set one flag and persist the whole map
    ///
    /// # Errors
    /// Storage write failures; the in-memory flag is still updated.
    pub fn set_complete(&mut self, id: &str, done: bool) -> Result<(), StoreError> {
        self.map.insert(id.to_string(), done);
        self.save()
    }

    /// Apply [`Self::set_complete`] to every id, each write persisted on its own
    ///
    /// # Errors
    /// Stops at the first storage failure.
    pub fn set_many<I, S>(&mut self, ids: I, done: bool) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0;
        for id in ids {
            self.set_complete(id.as_ref(), done)?;
            count += 1;
        }
        Ok(count)
    }

    /// Replace the whole map (import) and persist it
    ///
    /// # Errors
    /// Storage write failures.
    pub fn replace_all(&mut self, map: BTreeMap<String, bool>) -> Result<(), StoreError> {
        self.map = map;
        self.save()
    }

    /// Number of ids marked complete, orphans included
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.map.values().filter(|v| **v).count()
    }

    /// Current map
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &BTreeMap<String, bool> {
        &self.map
    }

    fn save(&self) -> Result<(), StoreError> {
        let body = serde_json::to_string(&self.map)?;
        self.storage.set(&self.key, &body)
    }
}

impl CompletionLookup for CompletionStore {
    fn is_complete(&self, id: &str) -> bool {
        CompletionStore::is_complete(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn storage() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn unknown_ids_are_incomplete() {
        let store = CompletionStore::open(storage(), "ns", "a").unwrap();
        assert!(!store.is_complete("i1"));
    }

    #[test]
    fn set_complete_survives_reload() {
        let s = storage();
        let mut store = CompletionStore::open(s.clone(), "ns", "a").unwrap();
        store.set_complete("i1", true).unwrap();
        assert!(store.is_complete("i1"));

        let reloaded = CompletionStore::open(s.clone(), "ns", "a").unwrap();
        assert!(reloaded.is_complete("i1"));
        assert_eq!(s.get("ns::a").unwrap().as_deref(), Some(r#"{"i1":true}"#));
    }

    #[test]
    fn routes_are_isolated() {
        let s = storage();
        let mut a = CompletionStore::open(s.clone(), "ns", "a").unwrap();
        a.set_complete("i1", true).unwrap();
        let b = CompletionStore::open(s, "ns", "b").unwrap();
        assert!(!b.is_complete("i1"));
    }

    #[test]
    fn corrupt_state_loads_empty() {
        let s = storage();
        s.set("ns::a", "not json").unwrap();
        let store = CompletionStore::open(s.clone(), "ns", "a").unwrap();
        assert!(store.snapshot().is_empty());
        s.set("ns::a", "[1,2]").unwrap();
        assert!(CompletionStore::open(s, "ns", "a").unwrap().snapshot().is_empty());
    }

    #[test]
    fn set_many_and_replace_all() {
        let s = storage();
        let mut store = CompletionStore::open(s.clone(), "ns", "a").unwrap();
        assert_eq!(store.set_many(["x", "y"], true).unwrap(), 2);
        assert_eq!(store.completed_count(), 2);

        let mut imported = BTreeMap::new();
        imported.insert("z".to_string(), true);
        store.replace_all(imported).unwrap();
        assert!(!store.is_complete("x"));
        assert!(CompletionStore::open(s, "ns", "a").unwrap().is_complete("z"));
    }
}
