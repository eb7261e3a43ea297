//! Integration tests for the three framework binding shapes.

mod common;

use anystate::adapter::{
    AccessorAdapter, BindingShape, Framework, FrameworkAdapter, RefAdapter, Setter, Subscription,
    ValueAdapter,
};
use anystate::{ComponentSystem, ReactiveConfig, ReactiveError};
use common::{doubling, state};

async fn doubled_counter(system: &ComponentSystem<i64>) -> anystate::ReactiveHandle<i64> {
    system
        .create(
            ReactiveConfig::new(1)
                .with_id("counter")
                .with_plugin(doubling("double")),
        )
        .await
        .unwrap()
}

// =============================================================================
// VALUE PAIR
// =============================================================================

#[tokio::test]
async fn value_pair_starts_from_current_value() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;

    let mut adapter = ValueAdapter::new(&system, &handle);
    let binding = adapter.bind().unwrap();
    assert_eq!(binding.value, 1);
    assert_eq!(binding.setter.id(), "counter");
}

#[tokio::test]
async fn value_pair_refresh_applies_committed_value() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;
    let mut adapter = ValueAdapter::new(&system, &handle);
    let mut binding = adapter.bind().unwrap();

    assert!(!adapter.refresh(&mut binding));

    binding.setter.set(4).await.unwrap();
    assert!(adapter.refresh(&mut binding));
    assert_eq!(binding.value, 8);

    // Nothing new since the last refresh.
    assert!(!adapter.refresh(&mut binding));
}

#[tokio::test]
async fn value_pair_stops_refreshing_after_cleanup() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;
    let mut adapter = ValueAdapter::new(&system, &handle);
    let mut binding = adapter.bind().unwrap();

    adapter.cleanup();
    binding.setter.set(5).await.unwrap();

    assert!(!adapter.refresh(&mut binding));
    assert_eq!(binding.value, 1);
    assert_eq!(system.get("counter").unwrap(), 10);
}

// =============================================================================
// ACCESSOR
// =============================================================================

#[tokio::test]
async fn accessor_reads_latest_refreshed_value() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;
    let mut adapter = AccessorAdapter::new(&system, &handle);
    let mut binding = adapter.bind().unwrap();
    let accessor = binding.accessor.clone();

    assert_eq!(accessor.get(), 1);

    binding.setter.set(3).await.unwrap();
    adapter.refresh(&mut binding);

    assert_eq!(accessor.get(), 6);
    assert_eq!(binding.accessor.get(), 6);
}

#[tokio::test]
async fn spawned_set_is_observed_through_subscription() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;
    let mut adapter = AccessorAdapter::new(&system, &handle);
    let mut binding = adapter.bind().unwrap();

    binding.setter.spawn(21).await.unwrap().unwrap();
    assert!(adapter.refresh(&mut binding));
    assert_eq!(binding.accessor.get(), 42);
}

// =============================================================================
// REF
// =============================================================================

#[tokio::test]
async fn ref_assignment_runs_the_pipeline() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;
    let mut adapter = RefAdapter::new(&system, &handle);
    let binding = adapter.bind().unwrap();
    let alias = binding.clone();

    binding.set_value(7).await.unwrap();

    assert_eq!(binding.value(), 14);
    assert_eq!(alias.value(), 14);
    assert_eq!(handle.get().unwrap(), 14);
}

#[tokio::test]
async fn ref_refresh_picks_up_external_sets() {
    let system = ComponentSystem::new();
    let handle = doubled_counter(&system).await;
    let mut adapter = RefAdapter::new(&system, &handle);
    let mut binding = adapter.bind().unwrap();

    system.set("counter", 2).await.unwrap();
    assert!(adapter.refresh(&mut binding));
    assert_eq!(binding.value(), 4);
}

#[tokio::test]
async fn ref_assignment_after_destroy_is_not_found() {
    let system = ComponentSystem::new();
    let handle = state(&system, "gone", 0).await;
    let mut adapter = RefAdapter::new(&system, &handle);
    let binding = adapter.bind().unwrap();

    system.destroy("gone").await.unwrap();

    let err = binding.set_value(1).await.unwrap_err();
    assert_eq!(err, ReactiveError::NotFound { id: "gone".to_string() });
    assert_eq!(binding.value(), 0);
}

// =============================================================================
// SHARED PIECES
// =============================================================================

#[tokio::test]
async fn bind_after_destroy_fails() {
    let system = ComponentSystem::new();
    let handle = state(&system, "x", 0).await;
    system.destroy("x").await.unwrap();

    let mut adapter = ValueAdapter::new(&system, &handle);
    assert!(matches!(adapter.bind(), Err(ReactiveError::NotFound { .. })));
}

#[tokio::test]
async fn subscription_waits_for_next_commit() {
    let system = ComponentSystem::new();
    let handle = state(&system, "x", 0).await;
    let mut subscription = Subscription::new(&handle);
    let setter = Setter::new(&system, &handle);

    let pending = setter.spawn(9);
    assert_eq!(subscription.changed().await, Some(9));
    pending.await.unwrap().unwrap();

    subscription.close();
    assert!(subscription.is_closed());
    assert_eq!(subscription.take_changed(), None);
    assert_eq!(subscription.changed().await, None);
}

#[test]
fn frameworks_map_to_binding_shapes() {
    let cases = [
        ("Counter.tsx", Framework::React, BindingShape::ValuePair),
        ("Counter.vue", Framework::Vue, BindingShape::Ref),
        ("Counter.svelte", Framework::Svelte, BindingShape::Ref),
        ("Counter.solid.tsx", Framework::Solid, BindingShape::Accessor),
        ("counter.component.ts", Framework::Angular, BindingShape::Accessor),
    ];
    for (file, framework, shape) in cases {
        assert_eq!(Framework::from_path(file), Some(framework), "{}", file);
        assert_eq!(framework.binding_shape(), shape);
    }
    assert_eq!(Framework::from_path("README.md"), None);
}
