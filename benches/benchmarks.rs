use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use canister::{
    ActionFn, Container, ContainerApi, ContainerHooks, ContainerProps, Props, StoreRegistry,
    StoreType,
};

struct Counter;

impl StoreType for Counter {
    type State = i32;

    fn key() -> &'static str {
        "counter"
    }

    fn initial_state() -> i32 {
        0
    }

    fn actions() -> Vec<(&'static str, ActionFn<i32>)> {
        vec![(
            "increment",
            Arc::new(|api, _, _| api.update_state(|n| *n += 1)),
        )]
    }
}

fn registry_lookup_benchmark(c: &mut Criterion) {
    let registry = StoreRegistry::new("bench");
    registry.get_store::<Counter>(Some("s1"));

    c.bench_function("registry_lookup_existing", |b| {
        b.iter(|| {
            black_box(registry.get_store::<Counter>(black_box(Some("s1"))));
        });
    });
}

fn registry_create_delete_benchmark(c: &mut Criterion) {
    let registry = StoreRegistry::new("bench");

    c.bench_function("registry_create_delete", |b| {
        b.iter(|| {
            black_box(registry.get_store::<Counter>(Some("ephemeral")));
            registry.delete_store::<Counter>(Some("ephemeral"));
        });
    });
}

fn gate_noop_benchmark(c: &mut Criterion) {
    let api = ContainerApi::root(Arc::new(StoreRegistry::new("bench")));
    let props = ContainerProps::new(Props::new().with("v", 1i64)).with_scope("s1");
    let mut container = Container::<Counter>::new(ContainerHooks::default(), api, &props);
    container.update(&props).unwrap();

    // Unchanged properties: the shallow-equal fast path.
    c.bench_function("gate_suppressed_update", |b| {
        b.iter(|| {
            container.update(black_box(&props)).unwrap();
        });
    });
}

fn action_dispatch_benchmark(c: &mut Criterion) {
    let api = ContainerApi::root(Arc::new(StoreRegistry::new("bench")));
    let props = ContainerProps::new(Props::new()).with_scope("s1");
    let mut container = Container::<Counter>::new(ContainerHooks::default(), api, &props);
    container.update(&props).unwrap();

    c.bench_function("action_dispatch", |b| {
        b.iter(|| {
            container.actions().dispatch(black_box("increment")).unwrap();
        });
    });
}

fn rebind_benchmark(c: &mut Criterion) {
    let api = ContainerApi::root(Arc::new(StoreRegistry::new("bench")));
    let at_a = ContainerProps::new(Props::new()).with_scope("a");
    let at_b = ContainerProps::new(Props::new()).with_scope("b");
    let mut container = Container::<Counter>::new(ContainerHooks::default(), api, &at_a);

    c.bench_function("scope_rebind", |b| {
        b.iter(|| {
            container.update(black_box(&at_b)).unwrap();
            container.commit();
            container.update(black_box(&at_a)).unwrap();
            container.commit();
        });
    });
}

criterion_group!(
    benches,
    registry_lookup_benchmark,
    registry_create_delete_benchmark,
    gate_noop_benchmark,
    action_dispatch_benchmark,
    rebind_benchmark
);
criterion_main!(benches);
