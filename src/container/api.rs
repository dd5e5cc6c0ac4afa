use std::any::TypeId;
use std::sync::Arc;

use crate::props::Props;
use crate::registry::{global_registry, ScopeId, StoreRegistry};
use crate::store::{bind_actions, ActionSet, StoreState, StoreType};

/// A store instance paired with the actions bound for the resolved context.
pub struct ScopedStore<T> {
    pub store_state: StoreState<T>,
    pub actions: ActionSet,
}

/// The owning container's binding, snapshotted into its api handle.
#[derive(Clone)]
pub(crate) struct OwnBinding {
    pub(crate) type_id: TypeId,
    pub(crate) registry: Arc<StoreRegistry>,
    pub(crate) scope: Option<ScopeId>,
    pub(crate) actions: ActionSet,
}

/// Explicit lookup handle passed down to descendant consumers.
///
/// Each container derives a child handle from the one it was given, so
/// lookups walk the chain of enclosing containers before falling back to
/// the global registry. Handles are cheap to clone and snapshot the
/// owning container's binding at derivation time; a container re-derives
/// its handle after every rebind.
///
/// # Examples
///
/// ```
/// use canister::{ContainerApi, StoreRegistry, StoreType};
/// use std::sync::Arc;
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
/// let api = ContainerApi::root(Arc::new(StoreRegistry::new("global")));
/// let scoped = api.get_store::<Counter>(Some("s1"));
/// assert_eq!(scoped.store_state.get(), 0);
/// ```
#[derive(Clone)]
pub struct ContainerApi {
    parent: Option<Arc<ContainerApi>>,
    global_registry: Arc<StoreRegistry>,
    own: Option<OwnBinding>,
}

impl ContainerApi {
    /// A chain root resolving every lookup against the given registry.
    pub fn root(global_registry: Arc<StoreRegistry>) -> Self {
        Self {
            parent: None,
            global_registry,
            own: None,
        }
    }

    pub(crate) fn child(parent: &ContainerApi, own: OwnBinding) -> Self {
        Self {
            parent: Some(Arc::new(parent.clone())),
            global_registry: Arc::clone(&parent.global_registry),
            own: Some(own),
        }
    }

    /// The shared global registry this chain resolves against.
    pub fn global_registry(&self) -> &Arc<StoreRegistry> {
        &self.global_registry
    }

    /// Resolve a store for a descendant consumer.
    ///
    /// When the requested type matches the owning container's bound type,
    /// this resolves in the owner's registry (defaulting to the owner's
    /// bound scope when no scope is given) and returns the owner's scoped
    /// actions. Otherwise the lookup walks up the chain and finally falls
    /// back to the global registry with freshly bound actions that see no
    /// container properties.
    pub fn get_store<O: StoreType>(&self, scope: Option<&str>) -> ScopedStore<O::State> {
        if let Some(own) = &self.own {
            if own.type_id == TypeId::of::<O>() {
                let scope = scope.map(str::to_owned).or_else(|| own.scope.clone());
                let store_state = own.registry.get_store::<O>(scope.as_deref());
                return ScopedStore {
                    store_state,
                    actions: own.actions.clone(),
                };
            }
        }
        match &self.parent {
            Some(parent) => parent.get_store::<O>(scope),
            None => {
                let store_state = self.global_registry.get_store::<O>(scope);
                let actions =
                    bind_actions(&O::actions(), store_state.clone(), Arc::new(Props::new));
                ScopedStore {
                    store_state,
                    actions,
                }
            }
        }
    }
}

impl Default for ContainerApi {
    /// A root handle over the process-wide global registry.
    fn default() -> Self {
        Self::root(global_registry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;
    impl StoreType for Counter {
        type State = i32;
        fn key() -> &'static str {
            "counter"
        }
        fn initial_state() -> i32 {
            0
        }
    }

    #[test]
    fn root_lookup_creates_in_global_registry() {
        let registry = Arc::new(StoreRegistry::new("global"));
        let api = ContainerApi::root(Arc::clone(&registry));

        let scoped = api.get_store::<Counter>(Some("s1"));
        assert!(registry.contains::<Counter>(Some("s1")));
        assert_eq!(scoped.store_state.get(), 0);
        assert!(scoped.actions.is_empty());
    }

    #[test]
    fn root_lookups_share_instances_per_scope() {
        let api = ContainerApi::root(Arc::new(StoreRegistry::new("global")));
        let a = api.get_store::<Counter>(Some("s1"));
        let b = api.get_store::<Counter>(Some("s1"));
        let c = api.get_store::<Counter>(None);

        assert!(a.store_state.same_instance(&b.store_state));
        assert!(!a.store_state.same_instance(&c.store_state));
    }
}
