use std::collections::HashMap;
use std::sync::Arc;

use crate::props::Props;
use crate::store::definition::{ActionFn, ActionSet, BoundAction, HookFn, StoreApi};
use crate::store::state::StoreState;

/// Accessor for the live container properties, evaluated at call time.
pub type PropsFn = Arc<dyn Fn() -> Props + Send + Sync>;

/// A lifecycle hook bound to one store instance and one action set.
pub type BoundHook = Arc<dyn Fn() + Send + Sync>;

/// Bind a set of action definitions to a specific store instance.
///
/// Each bound callable evaluates `props_fn` when invoked, not when bound,
/// so actions always see the latest external properties even if they were
/// bound before those properties changed.
pub fn bind_actions<T>(
    defs: &[(&'static str, ActionFn<T>)],
    store: StoreState<T>,
    props_fn: PropsFn,
) -> ActionSet
where
    T: Clone + Send + Sync + 'static,
{
    let mut bound = HashMap::with_capacity(defs.len());
    for (name, def) in defs {
        let api = StoreApi::new(store.clone());
        let def = Arc::clone(def);
        let props_fn = Arc::clone(&props_fn);
        let action: BoundAction = Arc::new(move |payload| def(&api, payload, &props_fn()));
        bound.insert(*name, action);
    }
    ActionSet::from_bound(bound)
}

/// Single-hook variant of [`bind_actions`] with the same call-time
/// properties contract, used for the `on_init`/`on_update` lifecycle hooks.
pub fn bind_action<T>(
    hook: HookFn<T>,
    store: StoreState<T>,
    props_fn: PropsFn,
    actions: ActionSet,
) -> BoundHook
where
    T: Clone + Send + Sync + 'static,
{
    let api = StoreApi::new(store);
    Arc::new(move || hook(&api, &props_fn(), &actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::PropValue;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::RwLock;

    fn live_props(shared: Arc<RwLock<Props>>) -> PropsFn {
        Arc::new(move || shared.read().unwrap().clone())
    }

    #[test]
    fn bound_actions_mutate_the_store() {
        let store = StoreState::new("counter", 0);
        let defs: Vec<(&'static str, ActionFn<i32>)> = vec![(
            "increment",
            Arc::new(|api, _, _| api.update_state(|n| *n += 1)),
        )];

        let actions = bind_actions(&defs, store.clone(), Arc::new(Props::new));
        actions.dispatch("increment").unwrap();
        actions.dispatch("increment").unwrap();
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn actions_see_call_time_properties() {
        let store = StoreState::new("sink", 0i64);
        let shared = Arc::new(RwLock::new(Props::new().with("step", 1i64)));

        let defs: Vec<(&'static str, ActionFn<i64>)> = vec![(
            "add_step",
            Arc::new(|api, _, props| {
                if let Some(PropValue::Int(step)) = props.get("step") {
                    let step = *step;
                    api.update_state(move |n| *n += step);
                }
            }),
        )];

        let actions = bind_actions(&defs, store.clone(), live_props(Arc::clone(&shared)));
        actions.dispatch("add_step").unwrap();
        assert_eq!(store.get(), 1);

        // Properties changed after binding; the action must see the change.
        *shared.write().unwrap() = Props::new().with("step", 10i64);
        actions.dispatch("add_step").unwrap();
        assert_eq!(store.get(), 11);
    }

    #[test]
    fn actions_receive_payloads() {
        let store = StoreState::new("counter", 0i64);
        let defs: Vec<(&'static str, ActionFn<i64>)> = vec![(
            "add",
            Arc::new(|api, payload, _| {
                if let PropValue::Int(amount) = payload {
                    let amount = *amount;
                    api.update_state(move |n| *n += amount);
                }
            }),
        )];

        let actions = bind_actions(&defs, store.clone(), Arc::new(Props::new));
        actions.dispatch_with("add", &PropValue::Int(5)).unwrap();
        assert_eq!(store.get(), 5);
    }

    #[test]
    fn bound_hook_receives_actions_and_props() {
        let store = StoreState::new("counter", 0);
        let defs: Vec<(&'static str, ActionFn<i32>)> = vec![(
            "increment",
            Arc::new(|api, _, _| api.update_state(|n| *n += 1)),
        )];
        let actions = bind_actions(&defs, store.clone(), Arc::new(Props::new));

        let calls = Arc::new(AtomicI64::new(0));
        let calls_clone = Arc::clone(&calls);
        let hook: HookFn<i32> = Arc::new(move |_, _, actions| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            actions.dispatch("increment").unwrap();
        });

        let bound = bind_action(hook, store.clone(), Arc::new(Props::new), actions);
        bound();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(), 1);
    }
}
