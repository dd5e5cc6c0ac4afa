//! # Canister
//!
//! Scoped store lifecycle management for Rust.
//!
//! Canister maps a `(store type, scope id)` pair to a single shared state
//! instance, creates that instance lazily on first use, tracks subscribers,
//! and retires instances that no longer have any. Retirement happens only
//! at explicit lifecycle boundaries, never speculatively.
//!
//! ## Registries and scopes
//!
//! A [`StoreRegistry`] owns at most one [`StoreState`] per scope key. One
//! [`global_registry`] is shared process-wide; containers bound without a
//! scope id or the global flag own a private registry instead, so siblings
//! never share state by accident.
//!
//! ## Containers
//!
//! A [`Container`] binds a [`StoreType`] to a scope: it builds an
//! [`ActionSet`] of callables closed over that scope's instance, rebuilds
//! the set whenever the scope changes, and diffs incoming [`Props`] so the
//! `on_init`/`on_update` hooks fire at most once per property change, with
//! init guaranteed before the first update after any (re)bind.
//!
//! ## Example
//!
//! ```
//! use canister::{
//!     ActionFn, Container, ContainerApi, ContainerHooks, ContainerProps, Props, StoreRegistry,
//!     StoreType,
//! };
//! use std::sync::Arc;
//!
//! struct Counter;
//!
//! impl StoreType for Counter {
//!     type State = i32;
//!
//!     fn key() -> &'static str {
//!         "counter"
//!     }
//!
//!     fn initial_state() -> i32 {
//!         0
//!     }
//!
//!     fn actions() -> Vec<(&'static str, ActionFn<i32>)> {
//!         vec![(
//!             "increment",
//!             Arc::new(|api, _payload, _props| api.update_state(|n| *n += 1)),
//!         )]
//!     }
//! }
//!
//! let root = ContainerApi::root(Arc::new(StoreRegistry::new("global")));
//! let props = ContainerProps::new(Props::new()).with_scope("s1");
//! let mut container = Container::<Counter>::new(ContainerHooks::default(), root, &props);
//!
//! container.update(&props).unwrap();
//! container.actions().dispatch("increment").unwrap();
//! assert_eq!(container.store().get(), 1);
//! ```

pub mod container;
pub mod error;
pub mod props;
pub mod registry;
pub mod store;

// Re-export main types for convenience
pub use container::{
    BindingPhase, Container, ContainerApi, ContainerHooks, ContainerProps, ScopedStore,
};
pub use error::ContainerError;
pub use props::{shallow_equal, PropValue, Props};
pub use registry::{global_registry, ScopeId, StoreRegistry};
pub use store::{
    bind_action, bind_actions, ActionFn, ActionSet, BoundHook, HookFn, PropsFn, StoreApi,
    StoreState, StoreType, Subscription,
};
