use parking_lot::RwLock;
use std::sync::Arc;

/// Single-slot "latest value" cell shared between one writer and one reader.
///
/// `store` replaces the whole value and `load` clones the whole value, both
/// under the lock, so a reader never observes a half-written sample.
/// Older values are simply overwritten; this is not a queue.
pub struct LatestCell<T> {
    slot: Arc<RwLock<Option<T>>>,
}

impl<T> Clone for LatestCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for LatestCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
        }
    }

    pub fn store(&self, value: T) {
        *self.slot.write() = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }
}

impl<T: Clone> LatestCell<T> {
    pub fn load(&self) -> Option<T> {
        self.slot.read().clone()
    }
}
