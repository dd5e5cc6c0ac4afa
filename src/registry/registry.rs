use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use crate::store::{StoreState, StoreType};

/// A caller-chosen identifier partitioning otherwise-shared state into
/// independent instances. `None` in an `Option<ScopeId>` denotes the
/// process-global instance of a store type.
pub type ScopeId = String;

#[derive(Clone, PartialEq, Eq, Hash)]
struct StoreKey {
    type_id: TypeId,
    scope: Option<ScopeId>,
}

/// Owns store instances keyed by `(store type, scope)`.
///
/// Instances are created lazily on first lookup and retired only through
/// [`delete_store`](StoreRegistry::delete_store), which refuses to remove an
/// instance that still has subscribers. Within one registry at most one
/// instance exists per key at any time.
///
/// # Examples
///
/// ```
/// use canister::{StoreRegistry, StoreType};
///
/// struct Counter;
/// impl StoreType for Counter {
///     type State = i32;
///     fn key() -> &'static str {
///         "counter"
///     }
///     fn initial_state() -> i32 {
///         0
///     }
/// }
///
/// let registry = StoreRegistry::new("example");
/// let a = registry.get_store::<Counter>(Some("s1"));
/// let b = registry.get_store::<Counter>(Some("s1"));
/// assert!(a.same_instance(&b));
///
/// let other = registry.get_store::<Counter>(Some("s2"));
/// assert!(!a.same_instance(&other));
/// ```
pub struct StoreRegistry {
    label: &'static str,
    stores: RwLock<HashMap<StoreKey, Arc<dyn Any + Send + Sync>>>,
}

impl StoreRegistry {
    /// Create an empty registry. The label only appears in log events.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// The label this registry was created with.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Return the instance for `(S, scope)`, creating it if absent.
    ///
    /// Creation runs the store type's `initial_state` under the registry
    /// lock, so two same-tick lookups can never race a duplicate instance
    /// into the map. A panicking `initial_state` surfaces to the caller.
    pub fn get_store<S: StoreType>(&self, scope: Option<&str>) -> StoreState<S::State> {
        let key = StoreKey {
            type_id: TypeId::of::<S>(),
            scope: scope.map(str::to_owned),
        };
        let mut stores = self.stores.write().unwrap();
        if let Some(existing) = stores.get(&key) {
            return existing
                .downcast_ref::<StoreState<S::State>>()
                .expect("registry entry type mismatch")
                .clone();
        }

        debug!(
            store = S::key(),
            scope = scope.unwrap_or("<none>"),
            registry = self.label,
            "creating store instance"
        );
        let store = StoreState::new(S::key(), S::initial_state());
        stores.insert(key, Arc::new(store.clone()));
        store
    }

    /// Remove the instance for `(S, scope)` if it has no subscribers.
    ///
    /// A no-op when the entry is absent or still has listeners; safe to
    /// call speculatively at lifecycle boundaries.
    pub fn delete_store<S: StoreType>(&self, scope: Option<&str>) {
        let key = StoreKey {
            type_id: TypeId::of::<S>(),
            scope: scope.map(str::to_owned),
        };
        let mut stores = self.stores.write().unwrap();
        let Some(entry) = stores.get(&key) else {
            return;
        };
        let store = entry
            .downcast_ref::<StoreState<S::State>>()
            .expect("registry entry type mismatch");
        if store.listener_count() > 0 {
            return;
        }

        debug!(
            store = S::key(),
            scope = scope.unwrap_or("<none>"),
            registry = self.label,
            "retiring store instance"
        );
        stores.remove(&key);
    }

    /// Whether an instance currently exists for `(S, scope)`.
    pub fn contains<S: StoreType>(&self, scope: Option<&str>) -> bool {
        let key = StoreKey {
            type_id: TypeId::of::<S>(),
            scope: scope.map(str::to_owned),
        };
        self.stores.read().unwrap().contains_key(&key)
    }

    /// Number of live instances in this registry.
    pub fn len(&self) -> usize {
        self.stores.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.read().unwrap().is_empty()
    }
}

/// Get or create the process-wide global registry.
///
/// Created once on first use and shared for the process lifetime. Scoped
/// and explicitly global containers resolve their instances here; there is
/// no eviction policy, so scope ids should not be minted unboundedly.
pub fn global_registry() -> Arc<StoreRegistry> {
    static REGISTRY: OnceLock<Arc<StoreRegistry>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(StoreRegistry::new("global"))))
}
