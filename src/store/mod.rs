//! Store instances and store-type definitions.
//!
//! A [`StoreType`] describes a kind of store: its state, initial value, and
//! named actions. A [`StoreState`] is one live instance of that state,
//! shared between every container and consumer bound to the same scope key.
//! The binder turns action definitions into callables closed over a specific
//! instance and a live-properties accessor.

mod binder;
mod definition;
mod state;

pub use binder::{bind_action, bind_actions, BoundHook, PropsFn};
pub use definition::{ActionFn, ActionSet, HookFn, StoreApi, StoreType};
pub use state::{StoreState, Subscription};
