//! Non-owning, replaceable delegate reference.

use std::sync::{Arc, RwLock, Weak};

/// Holds at most one weak reference to a delegate.
///
/// The slot never keeps its delegate alive: once the last `Arc` held by the
/// application is dropped, [`DelegateSlot::current`] returns `None`.
pub struct DelegateSlot<D: ?Sized> {
    inner: RwLock<Option<Weak<D>>>,
}

impl<D: ?Sized> DelegateSlot<D> {
    #[must_use]
    pub fn new(delegate: Option<&Arc<D>>) -> Self {
        Self {
            inner: RwLock::new(delegate.map(Arc::downgrade)),
        }
    }

    /// Attach `delegate`, or clear the slot with `None`.
    pub fn set(&self, delegate: Option<&Arc<D>>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = delegate.map(Arc::downgrade);
    }

    /// The attached delegate, if it is still alive.
    ///
    /// The returned `Arc` is a temporary upgrade; drop it once the callback
    /// returns.
    #[must_use]
    pub fn current(&self) -> Option<Arc<D>> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().and_then(Weak::upgrade)
    }

    /// Whether a live delegate is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }
}

impl<D: ?Sized> Default for DelegateSlot<D> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }
}

impl<D: ?Sized> std::fmt::Debug for DelegateSlot<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}
