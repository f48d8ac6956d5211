//! In-memory server store.
//!
//! The single shared mutable resource in the daemon. All registry state
//! lives behind this handle; no other component touches the map directly.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use dashmap::DashMap;

use beacon_core::{ServerEntry, ServerId};

/// Store failure.
///
/// The in-memory store never fails; this exists so `register` keeps an
/// error channel open for a future durable backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Concurrent map of registered servers, keyed by identity.
///
/// Cheap to clone — clones share the same underlying map. Mutations on the
/// same identity are linearized by the map's internal locking; reads may
/// proceed concurrently and always observe whole entries, never partial
/// writes.
#[derive(Clone, Default)]
pub struct ServerStore {
    servers: Arc<DashMap<ServerId, ServerEntry>>,
}

impl ServerStore {
    pub fn new() -> Self {
        Self {
            servers: Arc::new(DashMap::new()),
        }
    }

    /// Whether an entry with this identity currently exists.
    pub fn has(&self, id: &ServerId) -> bool {
        self.servers.contains_key(id)
    }

    /// Snapshot copies of all current entries. Order is unspecified.
    pub fn list(&self) -> Vec<ServerEntry> {
        self.servers.iter().map(|e| e.value().clone()).collect()
    }

    /// Insert or replace the entry keyed by its address identity.
    ///
    /// Returns whether an entry with that identity existed immediately
    /// before this call. The replace is atomic — concurrent readers see
    /// either the old entry or the new one, never a mix.
    pub fn register(&self, entry: ServerEntry) -> Result<bool, StoreError> {
        let id = entry.id();
        let existed = self.servers.insert(id, entry).is_some();
        Ok(existed)
    }

    /// Delete the entry if present. Idempotent; returns whether removal
    /// had an effect.
    pub fn remove(&self, id: &ServerId) -> bool {
        self.servers.remove(id).is_some()
    }

    /// Remove every entry whose `last_seen` is older than `now - threshold`.
    /// Returns how many entries were removed.
    pub fn prune(&self, threshold: Duration) -> usize {
        let cutoff = SystemTime::now() - threshold;

        let mut removed = 0;
        self.servers.retain(|id, entry| {
            let stale = entry.last_seen < cutoff;
            if stale {
                tracing::info!(server = %id, "pruning stale server");
                removed += 1;
            }
            !stale
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
