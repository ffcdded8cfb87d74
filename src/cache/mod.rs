//! Single-slot response cache.
//!
//! Holds the last full employee listing the backend client fetched. The slot
//! is replaced whole on every write and emptied on every mutation attempt, so
//! readers only ever see a complete snapshot or nothing.

use std::sync::{Arc, PoisonError, RwLock};

use crate::backend::EmployeeCollection;

/// Read/write/clear capability over the cached employee listing.
pub trait ResponseCache: Send + Sync {
    /// The last written snapshot, or `None` if never written or cleared.
    fn read(&self) -> Option<Arc<EmployeeCollection>>;

    /// Replace the slot with `collection`.
    fn write(&self, collection: EmployeeCollection);

    /// Empty the slot.
    fn clear(&self);
}

/// In-process [`ResponseCache`] backed by a lock-protected slot.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    slot: RwLock<Option<Arc<EmployeeCollection>>>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache ready to be shared with a client.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns true if the slot currently holds a snapshot.
    pub fn is_populated(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl ResponseCache for SnapshotCache {
    fn read(&self) -> Option<Arc<EmployeeCollection>> {
        // A poisoned guard still holds a whole snapshot: writes never leave it half-done.
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, collection: EmployeeCollection) {
        let snapshot = Arc::new(collection);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
