//! Recently accepted searches.
//!
//! History is a convenience: every storage failure is logged and treated as
//! "no history" so it can never break a search session. Writes replace the
//! whole list, so two sessions sharing a key follow last-writer-wins.

use pawsearch_core::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Persists bounded history lists in a [`KeyValueStore`].
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the list stored under `key`, most recent first.
    ///
    /// Missing, unreadable or corrupt values yield an empty list.
    pub fn load(&self, key: &str) -> Vec<String> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read search history");
                return Vec::new();
            }
        };

        match decode(key, &raw) {
            Ok(entries) => {
                debug!(key, count = entries.len(), "Loaded search history");
                entries
            }
            Err(e) => {
                warn!(key, code = %e.code, error = %e.message, "Ignoring corrupt search history");
                Vec::new()
            }
        }
    }

    /// Persist `entries` under `key`, replacing what was there.
    pub fn save(&self, key: &str, entries: &[String]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode search history");
                return;
            }
        };

        if let Err(e) = self.store.set_item(key, &json) {
            warn!(key, error = %e, "Failed to save search history");
        }
    }

    /// Remove the persisted list entirely.
    pub fn clear(&self, key: &str) {
        if let Err(e) = self.store.remove_item(key) {
            warn!(key, error = %e, "Failed to clear search history");
        }
    }
}

fn decode(key: &str, raw: &str) -> pawsearch_core::Result<Vec<String>> {
    pawsearch_search::vocabulary_from_json(raw)
        .map_err(|e| pawsearch_core::Error::corrupt_value(key, e.to_string()))
}

/// Move `term` to the front of `existing`, dropping duplicates and anything past `max_items`.
pub fn record(existing: &[String], term: &str, max_items: usize) -> Vec<String> {
    std::iter::once(term.to_string())
        .chain(existing.iter().filter(|entry| *entry != term).cloned())
        .take(max_items)
        .collect()
}

/// `existing` without `term`.
pub fn remove(existing: &[String], term: &str) -> Vec<String> {
    existing.iter().filter(|entry| *entry != term).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawsearch_core::storage::MemoryStore;
    use pawsearch_core::{Error, Result};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage_unavailable("storage disabled"))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::storage_unavailable("quota exceeded"))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Err(Error::storage_unavailable("storage disabled"))
        }
    }

    #[test]
    fn test_record_into_empty() {
        assert_eq!(record(&[], "pug", 5), strings(&["pug"]));
    }

    #[test]
    fn test_record_moves_existing_to_front() {
        assert_eq!(
            record(&strings(&["pug", "beagle"]), "pug", 5),
            strings(&["pug", "beagle"])
        );
        assert_eq!(
            record(&strings(&["beagle", "pug"]), "pug", 5),
            strings(&["pug", "beagle"])
        );
    }

    #[test]
    fn test_record_truncates_oldest() {
        let full = strings(&["e", "d", "c", "b", "a"]);
        assert_eq!(record(&full, "f", 5), strings(&["f", "e", "d", "c", "b"]));
    }

    #[test]
    fn test_record_is_case_sensitive() {
        assert_eq!(record(&strings(&["Pug"]), "pug", 5), strings(&["pug", "Pug"]));
    }

    #[test]
    fn test_remove() {
        assert_eq!(remove(&strings(&["pug", "beagle"]), "pug"), strings(&["beagle"]));
    }

    #[test]
    fn test_save_then_load() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        history.save("dogs", &strings(&["pug", "beagle"]));
        assert_eq!(history.load("dogs"), strings(&["pug", "beagle"]));
        assert!(history.load("cats").is_empty());
    }

    #[test]
    fn test_corrupt_json_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set_item("dogs", "{not json").unwrap();
        let history = HistoryStore::new(store.clone());
        assert!(history.load("dogs").is_empty());

        store.set_item("dogs", "{\"pug\": 1}").unwrap();
        assert!(history.load("dogs").is_empty());
    }

    #[test]
    fn test_corrupt_json_is_a_corrupt_value() {
        let err = decode("dogs", "{\"pug\": 1}").unwrap_err();
        assert_eq!(err.code, pawsearch_core::ErrorCode::CorruptValue);
        assert!(err.message.contains("'dogs'"));
        assert_eq!(decode("dogs", "[\"pug\"]").unwrap(), strings(&["pug"]));
    }

    #[test]
    fn test_clear_removes_value() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(store.clone());
        history.save("dogs", &strings(&["pug"]));
        history.clear("dogs");
        assert!(store.get_item("dogs").unwrap().is_none());
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let history = HistoryStore::new(Arc::new(BrokenStore));
        assert!(history.load("dogs").is_empty());
        history.save("dogs", &strings(&["pug"]));
        history.clear("dogs");
    }
}
