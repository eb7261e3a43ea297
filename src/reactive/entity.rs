//! The live reactive entity and the handle callers hold to it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::{ReactiveError, Result};
use crate::plugin::PluginPipeline;
use crate::reactive::lifecycle::{InvalidTransition, LifecycleEvent, LifecycleState};
use crate::reactive::types::{Derivation, ReactiveKind};

/// A live reactive value.
///
/// Owned by the [`ComponentSystem`](crate::system::ComponentSystem) that
/// created it. The value sits in a `watch` channel so subscribers see each
/// commit; only the update pipeline writes to it.
pub(crate) struct Reactive<T> {
    pub(crate) id: String,
    pub(crate) kind: ReactiveKind,
    pub(crate) dependencies: Vec<String>,
    pub(crate) meta: HashMap<String, Value>,
    pub(crate) pipeline: PluginPipeline<T>,
    pub(crate) derivation: Option<Derivation<T>>,
    value: watch::Sender<T>,
    state: Mutex<LifecycleState>,
    /// Serializes update pipelines (and effect runs) for this id.
    pub(crate) gate: tokio::sync::Mutex<()>,
}

pub(crate) struct ReactiveParts<T> {
    pub id: String,
    pub kind: ReactiveKind,
    pub value: T,
    pub dependencies: Vec<String>,
    pub meta: HashMap<String, Value>,
    pub pipeline: PluginPipeline<T>,
    pub derivation: Option<Derivation<T>>,
}

impl<T> Reactive<T> {
    /// Construct a reactive in the `Uninitialized` state.
    pub(crate) fn new(parts: ReactiveParts<T>) -> Self {
        let (value, _) = watch::channel(parts.value);
        Self {
            id: parts.id,
            kind: parts.kind,
            dependencies: parts.dependencies,
            meta: parts.meta,
            pipeline: parts.pipeline,
            derivation: parts.derivation,
            value,
            state: Mutex::new(LifecycleState::Uninitialized),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub(crate) fn transition(
        &self,
        event: LifecycleEvent,
    ) -> std::result::Result<LifecycleState, InvalidTransition> {
        let mut state = self.state.lock();
        *state = state.next(event)?;
        Ok(*state)
    }

    /// Enter `Updating`. Fails with `NotFound` once destruction has started.
    pub(crate) fn begin_update(&self) -> Result<()> {
        self.transition(LifecycleEvent::Set)
            .map(|_| ())
            .map_err(|_| ReactiveError::not_found(&self.id))
    }

    /// Return to `Active` after a rejected update. No-op once destroying.
    pub(crate) fn abort_update(&self) {
        let mut state = self.state.lock();
        if *state == LifecycleState::Updating {
            *state = LifecycleState::Active;
        }
    }

    /// Commit `value` and return to `Active`.
    ///
    /// Returns `false` without touching the value if destruction started
    /// while the update was in flight.
    pub(crate) fn commit(&self, value: T) -> bool {
        let mut state = self.state.lock();
        match state.next(LifecycleEvent::UpdateFinished) {
            Ok(next) => {
                self.value.send_replace(value);
                *state = next;
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.value.subscribe()
    }
}

impl<T: Clone> Reactive<T> {
    pub(crate) fn value(&self) -> T {
        self.value.borrow().clone()
    }
}

/// Caller-side handle to a reactive.
///
/// Reads go straight to the live value; writes go through
/// [`ComponentSystem::set`](crate::system::ComponentSystem::set). Once the
/// reactive is destroyed every read fails with `NotFound`.
pub struct ReactiveHandle<T> {
    pub(crate) inner: Arc<Reactive<T>>,
}

impl<T> Clone for ReactiveHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ReactiveHandle<T> {
    pub(crate) fn new(inner: Arc<Reactive<T>>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> ReactiveKind {
        self.inner.kind
    }

    pub fn dependencies(&self) -> &[String] {
        &self.inner.dependencies
    }

    pub fn meta(&self) -> &HashMap<String, Value> {
        &self.inner.meta
    }

    /// Names of the plugins attached to this reactive, in order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.inner.pipeline.names()
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state()
    }

    /// False once the reactive has been destroyed.
    pub fn is_live(&self) -> bool {
        self.inner.state() != LifecycleState::Destroyed
    }

    /// Receiver that yields every committed value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.subscribe()
    }

    /// True when both handles point at the same live entity.
    pub fn same_reactive(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> ReactiveHandle<T> {
    /// Current committed value.
    pub fn get(&self) -> Result<T> {
        if !self.is_live() {
            return Err(ReactiveError::not_found(&self.inner.id));
        }
        Ok(self.inner.value())
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveHandle")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("state", &self.inner.state())
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}
