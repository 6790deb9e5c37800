//! Explicit observable state containers.
//!
//! The portal pages hang their fetched data off `Observed<T>` slots instead
//! of a reactivity runtime: subscribers are plain callbacks invoked after
//! every write. Containers are constructed by the owning view and handed to
//! controllers; there is no ambient global state.

use std::sync::{Arc, Mutex};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<Option<Subscriber<T>>>>,
}

/// A shared, observable value. Cloning shares the underlying slot.
pub struct Observed<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send> Observed<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.lock().expect("observed lock").clone()
    }

    /// Replace the value and publish to all subscribers.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.inner.value.lock().expect("observed lock");
            *guard = value;
        }
        self.publish();
    }

    /// Mutate in place, then publish.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut guard = self.inner.value.lock().expect("observed lock");
            f(&mut guard);
        }
        self.publish();
    }

    /// Register a change callback. Returns a token for `unsubscribe`.
    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> usize {
        let mut subs = self.inner.subscribers.lock().expect("subscriber lock");
        subs.push(Some(Arc::new(f)));
        subs.len() - 1
    }

    pub fn unsubscribe(&self, token: usize) {
        let mut subs = self.inner.subscribers.lock().expect("subscriber lock");
        if let Some(slot) = subs.get_mut(token) {
            *slot = None;
        }
    }

    // Snapshot the value and the subscriber list before invoking anything:
    // neither mutex is held during callbacks, so a subscriber may read or
    // write the slot, or register another subscriber, without deadlocking.
    fn publish(&self) {
        let snapshot = self.get();
        let subs: Vec<Subscriber<T>> = {
            let guard = self.inner.subscribers.lock().expect("subscriber lock");
            guard.iter().flatten().cloned().collect()
        };
        for sub in &subs {
            sub(&snapshot);
        }
    }
}

impl<T: Clone + Send + Default> Default for Observed<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
