//! Disposal-guarded shared access to a collection
//!
//! Host messages and deferred drop-text reads can outlive the view that
//! owns a collection. The handle carries a liveness flag: once the owner
//! disposes it, late mutations become no-ops instead of landing on a
//! torn-down collection.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::TabCollection;

#[derive(Clone)]
pub struct CollectionHandle {
    inner: Arc<RwLock<TabCollection>>,
    live: Arc<AtomicBool>,
}

impl CollectionHandle {
    pub fn new(collection: TabCollection) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collection)),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Mark the collection as torn down. Every subsequent mutation
    /// through any clone of this handle is a no-op.
    pub fn dispose(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TabCollection) -> T,
    {
        f(&self.inner.read())
    }

    /// Apply a mutation; returns `None` if the handle was disposed.
    pub fn mutate<F, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut TabCollection) -> T,
    {
        if !self.is_live() {
            tracing::debug!("Ignoring mutation on disposed collection");
            return None;
        }
        Some(f(&mut self.inner.write()))
    }

    pub fn snapshot(&self) -> TabCollection {
        self.inner.read().clone()
    }
}

impl Default for CollectionHandle {
    fn default() -> Self {
        Self::new(TabCollection::new())
    }
}
