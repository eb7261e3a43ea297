//! Shared test utilities for the component system suites.

#![allow(dead_code, unused_imports)]

use anystate::{ComponentSystem, HookError, Plugin, ReactiveConfig, ReactiveHandle};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Ordered record of hook invocations, shared between plugins under test.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().clone()
}

/// Plugin that doubles every proposed value.
pub fn doubling(name: &str) -> Plugin<i64> {
    Plugin::builder(name)
        .before_update(|_, v: i64| Ok(v * 2))
        .build()
}

/// Plugin that adds `delta` to every proposed value.
pub fn adding(name: &str, delta: i64) -> Plugin<i64> {
    Plugin::builder(name)
        .before_update(move |_, v: i64| Ok(v + delta))
        .build()
}

/// Plugin that appends `"{name}:{stage}"` to `log` at every lifecycle point.
pub fn recording(name: &str, log: &CallLog) -> Plugin<i64> {
    let tag = |stage: &str| format!("{}:{}", name, stage);
    let (a, b, c, d, e) = (
        (Arc::clone(log), tag("before_create")),
        (Arc::clone(log), tag("after_create")),
        (Arc::clone(log), tag("before_update")),
        (Arc::clone(log), tag("after_update")),
        (Arc::clone(log), tag("before_destroy")),
    );
    Plugin::builder(name)
        .before_create(move |config| {
            a.0.lock().push(a.1.clone());
            Ok(config)
        })
        .after_create(move |_| {
            b.0.lock().push(b.1.clone());
            Ok(())
        })
        .before_update(move |_, v: i64| {
            c.0.lock().push(c.1.clone());
            Ok(v)
        })
        .after_update(move |_| {
            d.0.lock().push(d.1.clone());
            Ok(())
        })
        .before_destroy(move |_| {
            e.0.lock().push(e.1.clone());
            Ok(())
        })
        .build()
}

/// Plugin whose `before_destroy` always fails with `reason`.
pub fn failing_teardown(name: &str, reason: &str) -> Plugin<i64> {
    let reason = reason.to_string();
    Plugin::builder(name)
        .before_destroy(move |_| Err(HookError::rejected(reason.clone())))
        .build()
}

/// Plugin whose `before_update` sleeps for `delay` before passing the value on.
pub fn slow_update(name: &str, delay: Duration) -> Plugin<i64> {
    Plugin::builder(name)
        .before_update_async(move |_, v: i64| async move {
            tokio::time::sleep(delay).await;
            Ok::<_, HookError>(v)
        })
        .build()
}

/// Plugin whose `before_destroy` sleeps for `delay` before succeeding.
pub fn slow_teardown(name: &str, delay: Duration) -> Plugin<i64> {
    Plugin::builder(name)
        .before_destroy_async(move |_| async move {
            tokio::time::sleep(delay).await;
            Ok::<_, HookError>(())
        })
        .build()
}

/// Create a plain `state` reactive with an explicit id.
pub async fn state(system: &ComponentSystem<i64>, id: &str, initial: i64) -> ReactiveHandle<i64> {
    system
        .create(ReactiveConfig::new(initial).with_id(id))
        .await
        .expect("failed to create reactive")
}
