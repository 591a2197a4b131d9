// ── Reactive QuickApp snapshot store ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via `watch` channels. Pure state: this module
// never touches the network.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::QuickApp;

/// The full local view of which QuickApps exist, keyed by device id.
///
/// Mutations are whole-record: insert, overwrite, or delete — partial
/// field patching is not supported. Every mutation bumps a version
/// counter and republishes the snapshot that subscribers receive.
pub struct SnapshotStore {
    by_id: DashMap<u64, Arc<QuickApp>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<QuickApp>>>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Swap the entire snapshot to the supplied records.
    ///
    /// Implemented as upsert-then-prune so subscribers never observe a
    /// transient empty state; a single snapshot publication happens at
    /// the end.
    pub fn replace_all(&self, records: Vec<QuickApp>) {
        let incoming: HashSet<u64> = records.iter().map(|r| r.id).collect();
        for record in records {
            self.by_id.insert(record.id, Arc::new(record));
        }
        let stale: Vec<u64> = self
            .by_id
            .iter()
            .map(|r| *r.key())
            .filter(|id| !incoming.contains(id))
            .collect();
        for id in stale {
            self.by_id.remove(&id);
        }
        self.publish();
    }

    /// Insert or wholesale-overwrite one record. Returns `true` if the
    /// id was new.
    pub fn upsert(&self, record: QuickApp) -> bool {
        let is_new = self.by_id.insert(record.id, Arc::new(record)).is_none();
        self.publish();
        is_new
    }

    /// Remove a record by id. A miss is not an error — the remote
    /// removal event may race a local miss — and publishes nothing.
    pub fn remove(&self, id: u64) -> Option<Arc<QuickApp>> {
        let removed = self.by_id.remove(&id).map(|(_, v)| v);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    /// Look up one record by id.
    pub fn get(&self, id: u64) -> Option<Arc<QuickApp>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Get the current snapshot (cheap `Arc` clone; ordering unspecified).
    pub fn snapshot(&self) -> Arc<Vec<Arc<QuickApp>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    ///
    /// The receiver is marked changed after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<QuickApp>>>> {
        self.snapshot.subscribe()
    }

    /// Subscribe to the bare mutation counter.
    pub fn version(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Rebuild the snapshot vec, broadcast it, and bump the version.
    fn publish(&self) {
        let values: Vec<Arc<QuickApp>> = self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn app(id: u64, name: &str) -> QuickApp {
        QuickApp {
            id,
            name: Some(name.to_owned()),
            kind: Some("com.fibaro.quickApp".to_owned()),
            modified: None,
            interfaces: vec!["quickApp".to_owned()],
            is_child: false,
        }
    }

    #[test]
    fn upsert_returns_true_for_new_id() {
        let store = SnapshotStore::new();
        assert!(store.upsert(app(1, "a")));
        assert!(!store.upsert(app(1, "a2")));
        assert_eq!(store.get(1).unwrap().name.as_deref(), Some("a2"));
    }

    #[test]
    fn remove_on_absent_id_is_a_silent_noop() {
        let store = SnapshotStore::new();
        store.upsert(app(1, "a"));
        let version_before = *store.version().borrow();

        assert!(store.remove(99).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(*store.version().borrow(), version_before);
    }

    #[test]
    fn replace_all_prunes_stale_entries() {
        let store = SnapshotStore::new();
        store.upsert(app(1, "a"));
        store.upsert(app(2, "b"));

        store.replace_all(vec![app(2, "b2"), app(3, "c")]);

        assert!(!store.contains(1));
        assert_eq!(store.get(2).unwrap().name.as_deref(), Some("b2"));
        assert!(store.contains(3));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_all_publishes_once() {
        let store = SnapshotStore::new();
        store.upsert(app(1, "a"));
        let version_before = *store.version().borrow();

        store.replace_all(vec![app(1, "a"), app(2, "b"), app(3, "c")]);

        assert_eq!(*store.version().borrow(), version_before + 1);
    }

    #[test]
    fn subscribers_see_mutations() {
        let store = SnapshotStore::new();
        let mut rx = store.subscribe();

        store.upsert(app(1, "a"));
        assert!(rx.has_changed().unwrap());
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.len(), 1);

        store.remove(1);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }
}
