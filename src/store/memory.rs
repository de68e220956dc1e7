//! In-memory state store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::store::{StateStore, StoreError, StoreSnapshot};

/// Keeps the snapshot in process memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<StoreSnapshot>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot.
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    /// Drop everything, as if the backing file had been deleted.
    pub fn clear(&self) {
        *self.snapshot.lock().expect("memory store mutex poisoned") = StoreSnapshot::new();
    }
}

impl StateStore for MemoryStore {
    fn load(&self, targets: &[String]) -> StoreSnapshot {
        let stored = self.snapshot.lock().expect("memory store mutex poisoned");
        targets
            .iter()
            .map(|url| (url.clone(), stored.get(url).cloned().unwrap_or_default()))
            .collect()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        *self.snapshot.lock().expect("memory store mutex poisoned") = snapshot.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn read_all(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(self.snapshot.lock().expect("memory store mutex poisoned").clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::classification::Classification;

    #[test]
    fn test_load_only_requested_targets() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.entry("https://a/").classification = Classification::Down;
        snapshot.entry("https://old/").classification = Classification::Up;
        let store = MemoryStore::with_snapshot(snapshot);

        let loaded = store.load(&["https://a/".into(), "https://b/".into()]);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("https://a/").unwrap().classification, Classification::Down);
        assert_eq!(loaded.get("https://b/").unwrap().classification, Classification::Unknown);
        assert!(loaded.get("https://old/").is_none());
    }

    #[test]
    fn test_clear_resets_to_defaults() {
        let store = MemoryStore::new();
        let mut snapshot = StoreSnapshot::new();
        snapshot.entry("https://a/").alert_active = true;
        store.save(&snapshot).unwrap();
        assert_eq!(store.save_count(), 1);

        store.clear();
        assert!(!store.load(&["https://a/".into()]).get("https://a/").unwrap().alert_active);
    }
}
