use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ContainerError;
use crate::props::{PropValue, Props};
use crate::store::state::StoreState;

/// An action definition: receives the store's mutation API, the call-time
/// payload, and the live container properties.
pub type ActionFn<T> = Arc<dyn Fn(&StoreApi<T>, &PropValue, &Props) + Send + Sync>;

/// A lifecycle hook definition. Hooks additionally receive the bound action
/// set so they can dispatch actions themselves.
pub type HookFn<T> = Arc<dyn Fn(&StoreApi<T>, &Props, &ActionSet) + Send + Sync>;

/// Defines a kind of store: its state type, registry key, initial value,
/// and named actions.
///
/// The implementing type is only a marker; the registry keys instances by
/// its `TypeId` plus a scope id, so two distinct types never collide even
/// when their `key()` strings match.
///
/// # Examples
///
/// ```
/// use canister::{ActionFn, StoreType};
/// use std::sync::Arc;
///
/// struct Counter;
///
/// impl StoreType for Counter {
///     type State = i32;
///
///     fn key() -> &'static str {
///         "counter"
///     }
///
///     fn initial_state() -> i32 {
///         0
///     }
///
///     fn actions() -> Vec<(&'static str, ActionFn<i32>)> {
///         vec![(
///             "increment",
///             Arc::new(|api, _payload, _props| api.update_state(|n| *n += 1)),
///         )]
///     }
/// }
/// ```
pub trait StoreType: 'static {
    /// The state held by instances of this store type.
    type State: Clone + Send + Sync + 'static;

    /// Identifier used for logging and debugging.
    fn key() -> &'static str;

    /// Produce the initial state for a freshly created instance.
    fn initial_state() -> Self::State;

    /// Named action definitions for this store type.
    fn actions() -> Vec<(&'static str, ActionFn<Self::State>)> {
        Vec::new()
    }
}

/// The mutation API handed to actions and hooks.
#[derive(Clone)]
pub struct StoreApi<T> {
    store: StoreState<T>,
}

impl<T: Clone + Send + Sync + 'static> StoreApi<T> {
    pub(crate) fn new(store: StoreState<T>) -> Self {
        Self { store }
    }

    /// Get a clone of the current state.
    pub fn get_state(&self) -> T {
        self.store.get()
    }

    /// Replace the state and notify subscribers.
    pub fn set_state(&self, new_state: T) {
        self.store.set(new_state);
    }

    /// Update the state in place and notify subscribers.
    pub fn update_state<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.store.update(f);
    }
}

pub(crate) type BoundAction = Arc<dyn Fn(&PropValue) + Send + Sync>;

/// A set of bound, callable actions.
///
/// Produced by [`bind_actions`](crate::bind_actions); each callable is
/// closed over one specific store instance and a live-properties accessor.
/// Sets are rebuilt, never mutated, when the owning container rebinds to a
/// new scope.
#[derive(Clone, Default)]
pub struct ActionSet {
    actions: Arc<HashMap<&'static str, BoundAction>>,
}

impl ActionSet {
    pub(crate) fn from_bound(actions: HashMap<&'static str, BoundAction>) -> Self {
        Self {
            actions: Arc::new(actions),
        }
    }

    /// Dispatch a named action with no payload.
    pub fn dispatch(&self, name: &str) -> Result<(), ContainerError> {
        self.dispatch_with(name, &PropValue::Null)
    }

    /// Dispatch a named action with a payload.
    pub fn dispatch_with(&self, name: &str, payload: &PropValue) -> Result<(), ContainerError> {
        match self.actions.get(name) {
            Some(action) => {
                action(payload);
                Ok(())
            }
            None => Err(ContainerError::UnknownAction(name.to_string())),
        }
    }

    /// Whether the set contains an action under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Iterate over the bound action names.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
