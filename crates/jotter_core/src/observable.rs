//! Current-value cache with change callbacks.
//!
//! # Invariants
//! - `get()` always returns the most recently `set` value.
//! - Callbacks run after the value is stored, outside the registry lock, so a
//!   callback may drop its own `Observer`.
//! - Dropping an `Observer` unregisters its callback.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: AtomicU64,
    callbacks: Mutex<HashMap<u64, Callback<T>>>,
}

/// Observable value shared between a producer task and UI consumers.
pub struct Observable<T> {
    value: watch::Sender<T>,
    registry: Arc<Registry<T>>,
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (value, _) = watch::channel(initial);
        Self {
            value,
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                callbacks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Receiver for async consumers; starts at the current value.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.value.subscribe()
    }

    /// Stores `value` and notifies every registered callback.
    pub fn set(&self, value: T) {
        self.value.send_replace(value.clone());
        let callbacks: Vec<Callback<T>> = self.registry.callbacks.lock().values().cloned().collect();
        for callback in callbacks {
            callback(&value);
        }
    }

    /// Registers `callback` for every later change.
    #[must_use = "the callback is unregistered when the observer is dropped"]
    pub fn observe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Observer<T> {
        let id = self.registry.next_id.fetch_add(1, Ordering::SeqCst);
        self.registry
            .callbacks
            .lock()
            .insert(id, Arc::new(callback));
        Observer {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.registry.callbacks.lock().len()
    }
}

/// Registration guard returned by [`Observable::observe`].
pub struct Observer<T> {
    id: u64,
    registry: Weak<Registry<T>>,
}

impl<T> Drop for Observer<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.callbacks.lock().remove(&self.id);
        }
    }
}

impl<T> std::fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer").field("id", &self.id).finish()
    }
}
