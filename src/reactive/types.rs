//! Creation requests and the values reactives are derived from.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HookError;
use crate::plugin::{HookFuture, Plugin};

/// Meta key holding the hook-style name a reactive was declared with.
pub const META_NAME: &str = "name";

/// Meta key holding the framework a reactive originates from.
pub const META_FRAMEWORK: &str = "framework";

/// What kind of value a reactive holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactiveKind {
    /// Plain state, only changed by `set`.
    #[default]
    State,
    /// Recomputed from its dependencies.
    Computed,
    /// Runs a side effect whenever its dependencies change.
    Effect,
}

impl fmt::Display for ReactiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReactiveKind::State => "state",
            ReactiveKind::Computed => "computed",
            ReactiveKind::Effect => "effect",
        };
        f.write_str(name)
    }
}

/// Current values of a reactive's declared dependencies, in declaration order.
///
/// A dependency that is not live (declared ahead of creation, or already
/// destroyed) is present with `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyValues<T> {
    entries: Vec<(String, Option<T>)>,
}

impl<T> DependencyValues<T> {
    pub(crate) fn new(entries: Vec<(String, Option<T>)>) -> Self {
        Self { entries }
    }

    /// Value of the dependency with this id, if it is declared and live.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(dep, _)| dep == id)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Iterate `(id, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&T>)> {
        self.entries
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_ref()))
    }

    /// Values of the live dependencies, in declaration order.
    pub fn live(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|(_, value)| value.as_ref())
    }

    /// True when every declared dependency is live.
    pub fn all_live(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type ComputeFn<T> = Arc<dyn Fn(&DependencyValues<T>) -> T + Send + Sync>;
pub type EffectFn<T> =
    Arc<dyn Fn(DependencyValues<T>) -> HookFuture<'static, Result<(), HookError>> + Send + Sync>;

/// How a `computed` or `effect` reactive reacts to dependency changes.
#[derive(Clone)]
pub enum Derivation<T> {
    /// Produce the next value from the dependencies. The result goes
    /// through the reactive's own update pipeline.
    Compute(ComputeFn<T>),
    /// Run a side effect. The reactive's value is left alone.
    Effect(EffectFn<T>),
}

impl<T> fmt::Debug for Derivation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derivation::Compute(_) => f.write_str("Derivation::Compute(..)"),
            Derivation::Effect(_) => f.write_str("Derivation::Effect(..)"),
        }
    }
}

/// Creation request for a reactive.
///
/// Only the fields below are interpreted by the engine. Anything else a
/// caller or plugin wants to carry goes into `meta`.
#[derive(Clone)]
pub struct ReactiveConfig<T> {
    /// Canonical id. Resolved from `meta["name"]` when absent.
    pub id: Option<String>,
    pub kind: ReactiveKind,
    pub initial_value: T,
    /// Ids this reactive depends on, in declaration order.
    pub dependencies: Vec<String>,
    /// Request-scoped plugins, run after any system-wide ones.
    pub plugins: Vec<Arc<Plugin<T>>>,
    pub meta: HashMap<String, Value>,
    pub derivation: Option<Derivation<T>>,
}

impl<T> ReactiveConfig<T> {
    /// A plain `state` reactive holding `initial_value`.
    pub fn new(initial_value: T) -> Self {
        Self {
            id: None,
            kind: ReactiveKind::State,
            initial_value,
            dependencies: Vec::new(),
            plugins: Vec::new(),
            meta: HashMap::new(),
            derivation: None,
        }
    }

    /// A `computed` reactive recomputed by `rule` whenever a dependency commits.
    pub fn computed<I, S, F>(initial_value: T, dependencies: I, rule: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&DependencyValues<T>) -> T + Send + Sync + 'static,
    {
        Self::new(initial_value)
            .with_kind(ReactiveKind::Computed)
            .with_dependencies(dependencies)
            .with_derivation(Derivation::Compute(Arc::new(rule)))
    }

    /// An `effect` reactive whose `body` runs after creation and on every
    /// dependency change.
    pub fn effect<I, S, F>(initial_value: T, dependencies: I, body: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(DependencyValues<T>) -> HookFuture<'static, Result<(), HookError>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(initial_value)
            .with_kind(ReactiveKind::Effect)
            .with_dependencies(dependencies)
            .with_derivation(Derivation::Effect(Arc::new(body)))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Record the hook-style name; used for the id when none is given.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_meta(META_NAME, Value::String(name.into()))
    }

    pub fn with_kind(mut self, kind: ReactiveKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Append a plugin to this request.
    pub fn with_plugin(mut self, plugin: impl Into<Arc<Plugin<T>>>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_derivation(mut self, derivation: Derivation<T>) -> Self {
        self.derivation = Some(derivation);
        self
    }

    /// Hook-style name recorded in `meta`, if any.
    pub fn name(&self) -> Option<&str> {
        self.meta.get(META_NAME).and_then(Value::as_str)
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveConfig")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("initial_value", &self.initial_value)
            .field("dependencies", &self.dependencies)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("meta", &self.meta)
            .field("derivation", &self.derivation)
            .finish()
    }
}
