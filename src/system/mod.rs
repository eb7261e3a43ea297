//! Component system: factory and registry for reactive values.
//!
//! ```text
//! create(config)
//!   → resolve id (explicit, canonical name, or generated)
//!   → validate (duplicate id, cycles, plugin names)
//!   → before_create fold → construct → register → after_create fan-out
//!
//! set(id, value)
//!   → [per-id gate] before_update fold → commit → after_update fan-out
//!   → recompute dependents in topological order
//!
//! destroy(id)
//!   → before_destroy fan-out (failures collected) → release id
//! ```
//!
//! Every system owns its registry. Cloning a `ComponentSystem` shares it;
//! [`ComponentSystem::new`] always starts an independent one.

mod graph;
mod registry;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{HookFailure, HookStage, ReactiveError, Result};
use crate::naming::canonical_id;
use crate::plugin::{bounded, HookTimeouts, Plugin, PluginPipeline};
use crate::reactive::{
    Derivation, LifecycleEvent, Reactive, ReactiveConfig, ReactiveHandle, ReactiveKind,
    ReactiveParts,
};
use registry::{graph_of, Registry};

/// Outcome of [`ComponentSystem::shutdown`].
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Ids that were released, in teardown order.
    pub destroyed: Vec<String>,
    /// `DestroyFailure`s reported along the way. Those ids were released too.
    pub failures: Vec<ReactiveError>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Factory and owner of reactive values.
pub struct ComponentSystem<T> {
    inner: Arc<SystemInner<T>>,
}

struct SystemInner<T> {
    registry: Registry<T>,
    /// System-wide plugins, run before each request's own plugins.
    plugins: Vec<Arc<Plugin<T>>>,
    config: EngineConfig,
    timeouts: HookTimeouts,
}

impl<T> Clone for ComponentSystem<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ComponentSystem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSystem")
            .field("plugins", &self.inner.plugins.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ComponentSystem<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> ComponentSystem<T> {
    /// Create an empty system with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty system with `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        let timeouts = HookTimeouts::from(&config.hooks);
        Self {
            inner: Arc::new(SystemInner {
                registry: Registry::new(),
                plugins: Vec::new(),
                config,
                timeouts,
            }),
        }
    }

    /// Install system-wide plugins, prepended to every creation request.
    ///
    /// Only takes effect before the system has been cloned.
    pub fn with_plugins(mut self, plugins: Vec<Arc<Plugin<T>>>) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.plugins = plugins,
            None => tracing::warn!("system already shared, ignoring system-wide plugins"),
        }
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Create a reactive and return a handle to it.
    ///
    /// Validation (duplicate id, dependency cycle, duplicate plugin name)
    /// happens before any plugin runs. The transformed config returned by
    /// the `before_create` fold is validated again when it is registered.
    pub async fn create(&self, mut config: ReactiveConfig<T>) -> Result<ReactiveHandle<T>> {
        let id = self.resolve_id(&config);
        config.id = Some(id.clone());

        let system = self.clone();
        detached(&id, async move { system.construct(config).await }).await
    }

    async fn construct(&self, config: ReactiveConfig<T>) -> Result<ReactiveHandle<T>> {
        let id = self.resolve_id(&config);
        let pipeline = self.pipeline_for(&config.plugins)?;
        self.inner.registry.validate(&id, &config.dependencies)?;

        tracing::debug!(
            id = %id,
            kind = %config.kind,
            plugins = pipeline.plugins().len(),
            "creating reactive"
        );

        let config = pipeline.before_create(config).await.map_err(|failure| {
            tracing::debug!(id = %id, error = %failure, "creation rejected");
            ReactiveError::from(failure)
        })?;

        let id = self.resolve_id(&config);
        let pipeline = self.pipeline_for(&config.plugins)?;
        let reactive = Arc::new(Reactive::new(ReactiveParts {
            id,
            kind: config.kind,
            value: config.initial_value,
            dependencies: config.dependencies,
            meta: config.meta,
            pipeline,
            derivation: config.derivation,
        }));
        for event in [LifecycleEvent::Create, LifecycleEvent::Constructed] {
            if let Err(e) = reactive.transition(event) {
                tracing::error!(id = %reactive.id, error = %e, "unexpected lifecycle state during construction");
            }
        }

        self.inner.registry.insert(Arc::clone(&reactive))?;
        let handle = ReactiveHandle::new(Arc::clone(&reactive));

        let failures = reactive.pipeline.after_create(&handle).await;
        warn_failures(&reactive.id, &failures);

        if reactive.kind == ReactiveKind::Effect {
            let _gate = reactive.gate.lock().await;
            if let Some(failure) = self.run_effect(&reactive).await {
                warn_failures(&reactive.id, &[failure]);
            }
        }

        tracing::debug!(id = %reactive.id, "reactive created");
        Ok(handle)
    }

    /// Route `value` through the update pipeline of `id` and recompute its dependents.
    ///
    /// Calls on the same id are serialized; the next one starts only after
    /// the previous one committed (or failed) and its dependents were
    /// recomputed. Interceptors must not call `set` on the id they intercept.
    ///
    /// Once started the pipeline runs to completion even if the returned
    /// future is dropped.
    pub async fn set(&self, id: &str, value: T) -> Result<()> {
        let reactive = self.lookup(id)?;
        let system = self.clone();
        detached(id, async move {
            let _gate = reactive.gate.lock().await;
            system.update(&reactive, value).await?;
            system.propagate(&reactive.id).await;
            Ok(())
        })
        .await
    }

    /// Run `before_destroy` hooks and release `id`.
    ///
    /// The id is released even when hooks fail; the failures come back as
    /// [`ReactiveError::DestroyFailure`]. Teardown finishes even if the
    /// returned future is dropped.
    pub async fn destroy(&self, id: &str) -> Result<()> {
        let reactive = self.lookup(id)?;
        reactive
            .transition(LifecycleEvent::Destroy)
            .map_err(|_| ReactiveError::not_found(id))?;
        tracing::debug!(id = %id, "destroying reactive");

        let system = self.clone();
        detached(id, async move { system.teardown(reactive).await }).await
    }

    /// Run `before_destroy` hooks and release the id. The caller has already
    /// moved `reactive` to `Destroying`.
    async fn teardown(&self, reactive: Arc<Reactive<T>>) -> Result<()> {
        let id = reactive.id.as_str();
        let handle = ReactiveHandle::new(Arc::clone(&reactive));
        let failures = reactive.pipeline.before_destroy(&handle).await;

        self.inner.registry.remove(&reactive);
        if let Err(e) = reactive.transition(LifecycleEvent::TeardownComplete) {
            tracing::error!(id = %id, error = %e, "unexpected lifecycle state during teardown");
        }

        if failures.is_empty() {
            tracing::debug!(id = %id, "reactive destroyed");
            return Ok(());
        }

        warn_failures(id, &failures);
        Err(ReactiveError::DestroyFailure {
            id: id.to_string(),
            failures,
        })
    }

    /// Current committed value of `id`.
    pub fn get(&self, id: &str) -> Result<T> {
        Ok(self.lookup(id)?.value())
    }

    /// Handle to the live reactive `id`.
    pub fn handle(&self, id: &str) -> Result<ReactiveHandle<T>> {
        self.lookup(id).map(ReactiveHandle::new)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.registry.contains(id)
    }

    /// Live ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.inner.registry.ids()
    }

    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live ids that directly declare `id` as a dependency, sorted.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        let declarations = self.inner.registry.declarations();
        graph_of(&declarations).direct_dependents(id)
    }

    /// Destroy every live reactive, dependents before their dependencies.
    pub async fn shutdown(&self) -> ShutdownReport {
        let declarations = self.inner.registry.declarations();
        let order = graph_of(&declarations).teardown_order();

        let mut report = ShutdownReport::default();
        for id in order {
            if !self.contains(&id) {
                continue;
            }
            match self.destroy(&id).await {
                Ok(()) => report.destroyed.push(id),
                Err(ReactiveError::NotFound { .. }) => {}
                Err(e) => {
                    report.destroyed.push(id);
                    report.failures.push(e);
                }
            }
        }

        tracing::info!(
            destroyed = report.destroyed.len(),
            failures = report.failures.len(),
            "component system shut down"
        );
        report
    }

    fn lookup(&self, id: &str) -> Result<Arc<Reactive<T>>> {
        self.inner
            .registry
            .get(id)
            .ok_or_else(|| ReactiveError::not_found(id))
    }

    fn resolve_id(&self, config: &ReactiveConfig<T>) -> String {
        if let Some(id) = &config.id {
            return id.clone();
        }
        if let Some(name) = config.name() {
            let id = canonical_id(name);
            if !id.is_empty() {
                return id;
            }
        }
        format!(
            "{}-{}",
            self.inner.config.naming.generated_prefix,
            Uuid::new_v4()
        )
    }

    fn pipeline_for(&self, request: &[Arc<Plugin<T>>]) -> Result<PluginPipeline<T>> {
        let plugins = self
            .inner
            .plugins
            .iter()
            .chain(request)
            .cloned()
            .collect();
        PluginPipeline::new(plugins, self.inner.timeouts)
    }

    /// One pass of the update pipeline. The caller holds the reactive's gate.
    async fn update(&self, reactive: &Reactive<T>, proposed: T) -> Result<()> {
        reactive.begin_update()?;

        let old = reactive.value();
        let next = match reactive.pipeline.before_update(&old, proposed).await {
            Ok(next) => next,
            Err(failure) => {
                reactive.abort_update();
                tracing::debug!(id = %reactive.id, error = %failure, "update rejected");
                return Err(failure.into());
            }
        };

        if !reactive.commit(next.clone()) {
            tracing::debug!(id = %reactive.id, "update discarded, reactive is being destroyed");
            return Err(ReactiveError::not_found(&reactive.id));
        }
        tracing::debug!(id = %reactive.id, "value committed");

        let failures = reactive.pipeline.after_update(&next).await;
        warn_failures(&reactive.id, &failures);
        Ok(())
    }

    /// Recompute everything downstream of `source`, each id once.
    async fn propagate(&self, source: &str) {
        let declarations = self.inner.registry.declarations();
        let order = graph_of(&declarations).downstream_of(source);
        if order.is_empty() {
            return;
        }
        tracing::trace!(source = %source, dependents = ?order, "propagating invalidation");

        for id in order {
            let Some(dependent) = self.inner.registry.get(&id) else {
                continue;
            };
            let _gate = dependent.gate.lock().await;
            self.recompute(&dependent).await;
        }
    }

    /// Re-run the derivation of `reactive`. The caller holds its gate.
    async fn recompute(&self, reactive: &Reactive<T>) {
        match (reactive.kind, &reactive.derivation) {
            (ReactiveKind::Computed, Some(Derivation::Compute(rule))) => {
                let values = self.inner.registry.dependency_values(&reactive.dependencies);
                let next = rule(&values);
                if let Err(e) = self.update(reactive, next).await {
                    tracing::warn!(id = %reactive.id, error = %e, "recompute failed");
                }
            }
            (ReactiveKind::Effect, Some(Derivation::Effect(_))) => {
                if let Some(failure) = self.run_effect(reactive).await {
                    warn_failures(&reactive.id, &[failure]);
                }
            }
            (kind, _) => {
                tracing::trace!(id = %reactive.id, kind = %kind, "no derivation to re-run");
            }
        }
    }

    /// Run the effect body of `reactive`. The caller holds its gate.
    async fn run_effect(&self, reactive: &Reactive<T>) -> Option<HookFailure> {
        let Some(Derivation::Effect(body)) = &reactive.derivation else {
            return None;
        };
        if reactive.state().is_terminal() {
            return None;
        }

        let values = self.inner.registry.dependency_values(&reactive.dependencies);
        tracing::trace!(id = %reactive.id, "running effect");
        bounded(body(values), self.inner.timeouts.hook)
            .await
            .err()
            .map(|error| HookFailure {
                plugin: EFFECT_PLUGIN.to_string(),
                stage: HookStage::Effect,
                error,
            })
    }
}

/// Plugin name effect failures are reported under.
const EFFECT_PLUGIN: &str = "effect";

/// Run `task` on its own tokio task and wait for it.
///
/// Dropping the caller's future leaves the task running, so a pipeline that
/// has started always reaches its commit or release.
async fn detached<R, F>(id: &str, task: F) -> Result<R>
where
    F: Future<Output = Result<R>> + Send + 'static,
    R: Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(ReactiveError::Aborted { id: id.to_string() }),
    }
}

fn warn_failures(id: &str, failures: &[HookFailure]) {
    for failure in failures {
        tracing::warn!(
            id = %id,
            plugin = %failure.plugin,
            stage = %failure.stage,
            error = %failure.error,
            "plugin hook failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;
    use crate::plugin::HookFuture;
    use crate::reactive::DependencyValues;

    fn effect(body: Result<(), HookError>) -> ReactiveConfig<i32> {
        ReactiveConfig::effect(
            0,
            Vec::<String>::new(),
            move |_: DependencyValues<i32>| -> HookFuture<'static, Result<(), HookError>> {
                let body = body.clone();
                Box::pin(async move { body })
            },
        )
    }

    #[tokio::test]
    async fn effect_failure_reports_effect_stage() {
        let system: ComponentSystem<i32> = ComponentSystem::new();
        let handle = system
            .create(effect(Err(HookError::rejected("effect broke"))))
            .await
            .unwrap();

        let reactive = system.lookup(handle.id()).unwrap();
        let failure = system.run_effect(&reactive).await.unwrap();
        assert_eq!(failure.plugin, "effect");
        assert_eq!(failure.stage, HookStage::Effect);
        assert_eq!(failure.error, HookError::rejected("effect broke"));
    }

    #[tokio::test]
    async fn successful_effect_reports_nothing() {
        let system: ComponentSystem<i32> = ComponentSystem::new();
        let handle = system
            .create(effect(Ok(())))
            .await
            .unwrap();

        let reactive = system.lookup(handle.id()).unwrap();
        assert!(system.run_effect(&reactive).await.is_none());
    }
}
