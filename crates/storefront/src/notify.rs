//! Change notification for store consumers.
//!
//! Stores call [`Listeners::notify`] synchronously after each atomic update,
//! so a view layer reading back through the store handle always observes the
//! completed mutation. This is the explicit seam where a UI shell would hang
//! its re-render trigger.

use std::sync::{Arc, Mutex, PoisonError};

/// A registered change listener.
///
/// Listeners receive no payload; they are expected to read current state
/// back through their store handle, mirroring a re-render.
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// A shared registry of change listeners.
///
/// Cloning shares the registry: all clones of a store handle notify the same
/// listeners.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Mutex<Vec<ChangeListener>>>,
}

impl Listeners {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, called after every subsequent state change.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.lock().push(Box::new(listener));
    }

    /// Invoke every registered listener, in registration order.
    pub(crate) fn notify(&self) {
        for listener in self.lock().iter() {
            listener();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ChangeListener>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.lock().len())
            .finish()
    }
}
