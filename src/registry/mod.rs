//! Scope-keyed ownership of store instances.
//!
//! A registry owns at most one [`StoreState`](crate::StoreState) per
//! `(store type, scope)` key, creates instances lazily on first lookup, and
//! retires them only when explicitly asked and only when no subscribers
//! remain. One global registry is shared process-wide; unscoped containers
//! own private local registries instead.

mod registry;

pub use registry::{global_registry, ScopeId, StoreRegistry};
