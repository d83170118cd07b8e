//! Append-only, per-container log storage shared between the ingest task and
//! the UI.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::parser::Entry;

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Vec<Arc<Entry>>>,
    /// Sorted, every name has a key in `entries`
    containers: Vec<String>,
}

/// Thread-safe log repository keyed by container name.
///
/// The name index and the entry map sit behind the same lock, so no reader
/// can see one updated without the other. Every read returns an owned
/// snapshot.
#[derive(Default)]
pub struct Store {
    inner: RwLock<Inner>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // The store only ever grows, so data behind a poisoned lock is still valid.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry, registering its container on first sight
    pub fn add(&self, entry: Entry) {
        let mut inner = self.write();
        let Inner { entries, containers } = &mut *inner;

        if !entries.contains_key(&entry.container) {
            if let Err(pos) = containers.binary_search(&entry.container) {
                containers.insert(pos, entry.container.clone());
            }
            tracing::debug!(container = %entry.container, "new container");
        }

        entries
            .entry(entry.container.clone())
            .or_default()
            .push(Arc::new(entry));
    }

    /// Sorted container names
    pub fn containers(&self) -> Vec<String> {
        self.read().containers.clone()
    }

    /// All entries of `container` in arrival order, empty for unknown names
    pub fn entries(&self, container: &str) -> Vec<Arc<Entry>> {
        self.entries_from(container, 0)
    }

    /// Entries of `container` starting at index `start`
    pub fn entries_from(&self, container: &str, start: usize) -> Vec<Arc<Entry>> {
        self.read()
            .entries
            .get(container)
            .and_then(|list| list.get(start..))
            .map(<[Arc<Entry>]>::to_vec)
            .unwrap_or_default()
    }

    pub fn entry_count(&self, container: &str) -> usize {
        self.read().entries.get(container).map_or(0, Vec::len)
    }

    pub fn total_entries(&self) -> usize {
        self.read().entries.values().map(Vec::len).sum()
    }

    /// Sorted `(name, count)` pairs taken under a single lock
    pub fn container_counts(&self) -> Vec<(String, usize)> {
        let inner = self.read();
        inner
            .containers
            .iter()
            .map(|name| (name.clone(), inner.entries.get(name).map_or(0, Vec::len)))
            .collect()
    }
}
