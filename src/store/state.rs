use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;
type ListenerVec<T> = Arc<RwLock<Vec<(usize, Listener<T>)>>>;

/// One live instance of a store's state.
///
/// Instances are created and owned by a
/// [`StoreRegistry`](crate::StoreRegistry), one per scope key, and shared by
/// cloning. A clone is the same instance: mutations through any handle
/// notify every subscriber, and [`same_instance`](StoreState::same_instance)
/// is true across clones.
pub struct StoreState<T> {
    key: &'static str,
    value: Arc<RwLock<T>>,
    listeners: ListenerVec<T>,
    next_listener_id: Arc<AtomicUsize>,
}

impl<T: Clone + Send + Sync + 'static> StoreState<T> {
    /// Create a new instance with the given initial value.
    pub fn new(key: &'static str, initial: T) -> Self {
        Self {
            key,
            value: Arc::new(RwLock::new(initial)),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The store type's key this instance was created for.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().unwrap().clone()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, new_value: T) {
        *self.value.write().unwrap() = new_value;
        self.notify();
    }

    /// Update the value in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut value = self.value.write().unwrap();
            f(&mut *value);
        }
        self.notify();
    }

    /// Read the value with a function without cloning.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let value = self.value.read().unwrap();
        f(&*value)
    }

    /// Subscribe to value changes.
    ///
    /// The callback runs on every `set`/`update` until the returned
    /// [`Subscription`] is dropped or explicitly unsubscribed. Live
    /// subscriptions keep the instance from being retired by its registry.
    ///
    /// Callbacks run while the value lock is held: calling `set` or
    /// `update` on the same store from inside a listener deadlocks.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .write()
            .unwrap()
            .push((id, Box::new(callback)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of live subscriptions.
    ///
    /// Registries use this as the retirement signal: an instance with zero
    /// listeners may be deleted at a lifecycle boundary.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap().len()
    }

    /// Whether two handles refer to the same underlying instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    fn notify(&self) {
        let value = self.value.read().unwrap();
        let listeners = self.listeners.read().unwrap();
        for (_, listener) in listeners.iter() {
            listener(&value);
        }
    }
}

impl<T> Clone for StoreState<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            value: Arc::clone(&self.value),
            listeners: Arc::clone(&self.listeners),
            next_listener_id: Arc::clone(&self.next_listener_id),
        }
    }
}

/// RAII guard for a store subscription.
///
/// Dropping the guard removes the listener. The guard holds only a weak
/// reference, so it stays inert if it outlives the store instance.
pub struct Subscription<T> {
    id: usize,
    listeners: Weak<RwLock<Vec<(usize, Listener<T>)>>>,
}

impl<T> Subscription<T> {
    /// Remove the listener now instead of at drop time.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.write() {
                listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
