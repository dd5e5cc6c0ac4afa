use std::any::TypeId;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::container::api::{ContainerApi, OwnBinding};
use crate::error::ContainerError;
use crate::props::{shallow_equal, Props};
use crate::registry::{ScopeId, StoreRegistry};
use crate::store::{
    bind_action, bind_actions, ActionSet, BoundHook, HookFn, PropsFn, StoreApi, StoreState,
    StoreType,
};

/// Where a container is in its binding lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingPhase {
    /// Constructed but not yet bound to a scope.
    Unbound,
    /// Bound to a scope; actions and hooks target its instance.
    Bound(Option<ScopeId>),
    /// Mid scope-change, rebuilding actions and hooks for the new scope.
    Rebinding(Option<ScopeId>),
    /// Torn down; no further updates are accepted.
    Unmounted,
}

/// One update pass's property delivery: the structural fields plus the
/// non-structural bag the lifecycle gate diffs.
#[derive(Clone, Debug, Default)]
pub struct ContainerProps {
    pub scope: Option<ScopeId>,
    pub is_global: bool,
    pub props: Props,
}

impl ContainerProps {
    pub fn new(props: Props) -> Self {
        Self {
            scope: None,
            is_global: false,
            props,
        }
    }

    /// Bind to an isolated instance under the given scope id.
    pub fn with_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Bind to the process-global instance instead of a private one.
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }
}

/// Optional lifecycle hooks for a container. Absent hooks are no-ops but
/// still consume their lifecycle slot, so the first property change after a
/// (re)bind is always the init event whether or not a hook observes it.
pub struct ContainerHooks<T> {
    pub(crate) on_init: Option<HookFn<T>>,
    pub(crate) on_update: Option<HookFn<T>>,
}

impl<T> Default for ContainerHooks<T> {
    fn default() -> Self {
        Self {
            on_init: None,
            on_update: None,
        }
    }
}

impl<T> ContainerHooks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook fired on the first property event after every (re)bind.
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StoreApi<T>, &Props, &ActionSet) + Send + Sync + 'static,
    {
        self.on_init = Some(Arc::new(hook));
        self
    }

    /// Hook fired on every property change after the init event.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StoreApi<T>, &Props, &ActionSet) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(hook));
        self
    }
}

/// Registry-selection inputs captured when a scope is left behind, so the
/// deferred retirement at commit time resolves against the registry that
/// scope actually used.
struct RetireTarget {
    scope: Option<ScopeId>,
    is_global: bool,
}

/// Binds one store type to a scope and drives its lifecycle.
///
/// The container resolves which registry owns its instance (private local
/// for unscoped non-global bindings, shared global otherwise), rebuilds its
/// bound actions and hooks on every scope change, diffs incoming properties
/// to fire `on_init`/`on_update` at most once per change, and retires
/// instances it leaves behind once they have no subscribers.
///
/// The host scheduler drives it: [`update`](Container::update) on every
/// property delivery, [`commit`](Container::commit) after a pass that
/// changed scope, [`unmount`](Container::unmount) on teardown. Retirement
/// happens only at those boundaries, never speculatively, so a store read
/// earlier in the same pass is never deleted out from under its reader.
pub struct Container<S: StoreType> {
    hooks: ContainerHooks<S::State>,
    ambient: ContainerApi,
    local_registry: Arc<StoreRegistry>,
    scope: Option<ScopeId>,
    is_global: bool,
    phase: BindingPhase,
    scoped_actions: ActionSet,
    on_init: Option<BoundHook>,
    on_update: Option<BoundHook>,
    pending_init: bool,
    // Shared with bound closures as their live-properties accessor.
    captured_props: Arc<RwLock<Option<Props>>>,
    pending_retire: Option<RetireTarget>,
}

impl<S: StoreType> Container<S> {
    /// Construct and bind for the initial scope.
    ///
    /// Binding resolves the registry, creates the instance if absent, and
    /// builds the action set and hook pair. The gate is not run here; the
    /// host delivers the mount pass through [`update`](Container::update),
    /// which fires `on_init`.
    pub fn new(
        hooks: ContainerHooks<S::State>,
        ambient: ContainerApi,
        initial: &ContainerProps,
    ) -> Self {
        let mut container = Self {
            hooks,
            ambient,
            local_registry: Arc::new(StoreRegistry::new("local")),
            scope: initial.scope.clone(),
            is_global: initial.is_global,
            phase: BindingPhase::Unbound,
            scoped_actions: ActionSet::default(),
            on_init: None,
            on_update: None,
            pending_init: false,
            captured_props: Arc::new(RwLock::new(None)),
            pending_retire: None,
        };
        container.bind_container_actions();
        container.phase = BindingPhase::Bound(container.scope.clone());
        container
    }

    /// Deliver one update pass.
    ///
    /// A detected scope change rebinds first, so the gate that follows in
    /// the same call already operates on the rebound hook pair; the scope
    /// left behind is recorded for retirement at [`commit`](Container::commit).
    /// The gate runs on every pass whether or not the scope changed.
    pub fn update(&mut self, next: &ContainerProps) -> Result<(), ContainerError> {
        if self.phase == BindingPhase::Unmounted {
            return Err(ContainerError::Unmounted);
        }

        if next.scope != self.scope {
            debug!(
                store = S::key(),
                from = self.scope.as_deref().unwrap_or("<none>"),
                to = next.scope.as_deref().unwrap_or("<none>"),
                "rebinding container"
            );
            self.phase = BindingPhase::Rebinding(next.scope.clone());
            let previous = RetireTarget {
                scope: self.scope.clone(),
                is_global: self.is_global,
            };
            self.scope = next.scope.clone();
            self.is_global = next.is_global;
            self.bind_container_actions();
            self.pending_retire = Some(previous);
            self.phase = BindingPhase::Bound(self.scope.clone());
        } else {
            self.is_global = next.is_global;
        }

        self.run_lifecycle_gate(&next.props);
        Ok(())
    }

    /// Commit the pass: retire the scope left behind by a rebind, if its
    /// instance has no remaining subscribers.
    pub fn commit(&mut self) {
        if let Some(previous) = self.pending_retire.take() {
            self.retire(&previous);
        }
    }

    /// Tear the container down, retiring any uncommitted previous scope and
    /// then the current one under the same zero-subscriber condition.
    /// Idempotent.
    pub fn unmount(&mut self) {
        if self.phase == BindingPhase::Unmounted {
            return;
        }
        if let Some(previous) = self.pending_retire.take() {
            self.retire(&previous);
        }
        let current = RetireTarget {
            scope: self.scope.clone(),
            is_global: self.is_global,
        };
        self.retire(&current);
        self.phase = BindingPhase::Unmounted;
    }

    /// The container's current binding phase.
    pub fn phase(&self) -> &BindingPhase {
        &self.phase
    }

    /// The currently bound scope id.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The actions bound for the current scope.
    pub fn actions(&self) -> &ActionSet {
        &self.scoped_actions
    }

    /// The store instance for the current binding.
    pub fn store(&self) -> StoreState<S::State> {
        self.resolve_registry().get_store::<S>(self.scope.as_deref())
    }

    /// Derive the lookup handle for descendant consumers.
    ///
    /// Re-derive after a pass that changed scope; the handle snapshots the
    /// current binding.
    pub fn api(&self) -> ContainerApi {
        ContainerApi::child(
            &self.ambient,
            OwnBinding {
                type_id: TypeId::of::<S>(),
                registry: Arc::clone(self.resolve_registry()),
                scope: self.scope.clone(),
                actions: self.scoped_actions.clone(),
            },
        )
    }

    /// Rebuild the action set and hook pair for the current scope.
    ///
    /// Every bound callable closes over the instance at the current scope
    /// key and over the shared captured-props cell, so a later rebind swaps
    /// the whole set instead of mutating it. Captured props reset so the
    /// next property event is diffed against nothing and fires `on_init`.
    fn bind_container_actions(&mut self) {
        let store = self.store();
        let props_fn = self.live_props_fn();

        let actions = bind_actions(&S::actions(), store.clone(), Arc::clone(&props_fn));
        self.on_init = self
            .hooks
            .on_init
            .clone()
            .map(|hook| bind_action(hook, store.clone(), Arc::clone(&props_fn), actions.clone()));
        self.on_update = self
            .hooks
            .on_update
            .clone()
            .map(|hook| bind_action(hook, store, props_fn, actions.clone()));
        self.scoped_actions = actions;

        *self.captured_props.write().unwrap() = None;
        self.pending_init = true;
    }

    /// Diff incoming properties against the last captured bag and fire at
    /// most one lifecycle hook: `on_init` for the first change after a
    /// (re)bind, `on_update` for every change thereafter.
    fn run_lifecycle_gate(&mut self, incoming: &Props) {
        let unchanged = self
            .captured_props
            .read()
            .unwrap()
            .as_ref()
            .is_some_and(|last| shallow_equal(last, incoming));
        if unchanged {
            return;
        }

        // Capture before firing so hooks read the fresh bag through the
        // live-properties accessor.
        *self.captured_props.write().unwrap() = Some(incoming.clone());

        if self.pending_init {
            self.pending_init = false;
            debug!(store = S::key(), "lifecycle gate: init");
            if let Some(hook) = &self.on_init {
                hook();
            }
        } else {
            debug!(store = S::key(), "lifecycle gate: update");
            if let Some(hook) = &self.on_update {
                hook();
            }
        }
    }

    fn live_props_fn(&self) -> PropsFn {
        let captured = Arc::clone(&self.captured_props);
        Arc::new(move || captured.read().unwrap().clone().unwrap_or_default())
    }

    fn resolve_registry(&self) -> &Arc<StoreRegistry> {
        self.registry_for(&self.scope, self.is_global)
    }

    /// Unscoped, non-global bindings use the private local registry; any
    /// scope id or the global flag selects the shared global registry.
    fn registry_for(&self, scope: &Option<ScopeId>, is_global: bool) -> &Arc<StoreRegistry> {
        if scope.is_none() && !is_global {
            &self.local_registry
        } else {
            self.ambient.global_registry()
        }
    }

    fn retire(&self, target: &RetireTarget) {
        self.registry_for(&target.scope, target.is_global)
            .delete_store::<S>(target.scope.as_deref());
    }
}

impl<S: StoreType> Drop for Container<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
