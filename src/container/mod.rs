//! Scope binding controllers.
//!
//! A [`Container`] binds one store type to a scope, owns the lifecycle of
//! the binding (rebind on scope change, deferred retirement at commit and
//! unmount), and gates the `on_init`/`on_update` hooks behind a shallow
//! diff of incoming properties. [`ContainerApi`] is the handle a container
//! hands to descendants so they can resolve stores without reaching for
//! ambient state.

mod api;
mod container;

pub use api::{ContainerApi, ScopedStore};
pub use container::{BindingPhase, Container, ContainerHooks, ContainerProps};
