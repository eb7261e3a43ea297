//! Plugin pipeline. Runs one lifecycle point across an ordered plugin list.
//!
//! ```text
//! before_create   config ─▶ p1 ─▶ p2 ─▶ … ─▶ config'     (fold, stops at first error)
//! before_update   value  ─▶ p1 ─▶ p2 ─▶ … ─▶ value'      (fold, stops at first error)
//! after_*         p1, p2, …                              (fan-out, every plugin runs)
//! before_destroy  p1, p2, …                              (fan-out, failures collected)
//! ```
//!
//! Plugins always run one at a time in registration order.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HookConfig;
use crate::error::{HookError, HookFailure, HookStage, ReactiveError};
use crate::plugin::Plugin;
use crate::reactive::{ReactiveConfig, ReactiveHandle};

/// Upper bounds applied to interceptor invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookTimeouts {
    /// Bound for every hook except `before_destroy`. `None` waits forever.
    pub hook: Option<Duration>,
    /// Bound for `before_destroy` hooks.
    pub destroy: Duration,
}

impl Default for HookTimeouts {
    fn default() -> Self {
        Self::from(&HookConfig::default())
    }
}

impl From<&HookConfig> for HookTimeouts {
    fn from(config: &HookConfig) -> Self {
        Self {
            hook: config.timeout_ms.map(Duration::from_millis),
            destroy: Duration::from_millis(config.destroy_timeout_ms),
        }
    }
}

/// Run `fut`, turning an elapsed bound into [`HookError::TimedOut`].
pub(crate) async fn bounded<R, F>(fut: F, timeout: Option<Duration>) -> Result<R, HookError>
where
    F: Future<Output = Result<R, HookError>>,
{
    match timeout {
        None => fut.await,
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(HookError::TimedOut {
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        },
    }
}

/// Ordered plugins attached to one reactive.
pub struct PluginPipeline<T> {
    plugins: Vec<Arc<Plugin<T>>>,
    timeouts: HookTimeouts,
}

impl<T> Clone for PluginPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            plugins: self.plugins.clone(),
            timeouts: self.timeouts,
        }
    }
}

impl<T> PluginPipeline<T> {
    /// Build a pipeline, refusing duplicate plugin names.
    pub fn new(plugins: Vec<Arc<Plugin<T>>>, timeouts: HookTimeouts) -> Result<Self, ReactiveError> {
        let mut seen = HashSet::new();
        for plugin in &plugins {
            if !seen.insert(plugin.name()) {
                return Err(ReactiveError::PluginRejected {
                    plugin: plugin.name().to_string(),
                    stage: HookStage::BeforeCreate,
                    reason: "duplicate plugin name".to_string(),
                });
            }
        }
        Ok(Self { plugins, timeouts })
    }

    pub fn plugins(&self) -> &[Arc<Plugin<T>>] {
        &self.plugins
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn timeouts(&self) -> HookTimeouts {
        self.timeouts
    }

    fn failure(plugin: &Plugin<T>, stage: HookStage, error: HookError) -> HookFailure {
        HookFailure {
            plugin: plugin.name().to_string(),
            stage,
            error,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> PluginPipeline<T> {
    /// Fold `config` through every `before_create` hook.
    pub async fn before_create(
        &self,
        mut config: ReactiveConfig<T>,
    ) -> Result<ReactiveConfig<T>, HookFailure> {
        for plugin in &self.plugins {
            let Some(hook) = &plugin.before_create else {
                continue;
            };
            tracing::trace!(plugin = %plugin.name(), "before_create");
            config = bounded(hook(config), self.timeouts.hook)
                .await
                .map_err(|e| Self::failure(plugin, HookStage::BeforeCreate, e))?;
        }
        Ok(config)
    }

    /// Run every `after_create` hook, collecting failures.
    pub async fn after_create(&self, handle: &ReactiveHandle<T>) -> Vec<HookFailure> {
        let mut failures = Vec::new();
        for plugin in &self.plugins {
            let Some(hook) = &plugin.after_create else {
                continue;
            };
            tracing::trace!(plugin = %plugin.name(), id = %handle.id(), "after_create");
            if let Err(e) = bounded(hook(handle.clone()), self.timeouts.hook).await {
                failures.push(Self::failure(plugin, HookStage::AfterCreate, e));
            }
        }
        failures
    }

    /// Fold a proposed value through every `before_update` hook.
    ///
    /// Each hook sees the committed value `old` and the fold so far.
    pub async fn before_update(&self, old: &T, proposed: T) -> Result<T, HookFailure> {
        let mut value = proposed;
        for plugin in &self.plugins {
            let Some(hook) = &plugin.before_update else {
                continue;
            };
            tracing::trace!(plugin = %plugin.name(), "before_update");
            value = bounded(hook(old.clone(), value), self.timeouts.hook)
                .await
                .map_err(|e| Self::failure(plugin, HookStage::BeforeUpdate, e))?;
        }
        Ok(value)
    }

    /// Run every `after_update` hook with the committed value, collecting failures.
    pub async fn after_update(&self, value: &T) -> Vec<HookFailure> {
        let mut failures = Vec::new();
        for plugin in &self.plugins {
            let Some(hook) = &plugin.after_update else {
                continue;
            };
            tracing::trace!(plugin = %plugin.name(), "after_update");
            if let Err(e) = bounded(hook(value.clone()), self.timeouts.hook).await {
                failures.push(Self::failure(plugin, HookStage::AfterUpdate, e));
            }
        }
        failures
    }

    /// Run every `before_destroy` hook. A failure never stops the others.
    pub async fn before_destroy(&self, handle: &ReactiveHandle<T>) -> Vec<HookFailure> {
        let mut failures = Vec::new();
        for plugin in &self.plugins {
            let Some(hook) = &plugin.before_destroy else {
                continue;
            };
            tracing::trace!(plugin = %plugin.name(), id = %handle.id(), "before_destroy");
            if let Err(e) = bounded(hook(handle.clone()), Some(self.timeouts.destroy)).await {
                failures.push(Self::failure(plugin, HookStage::BeforeDestroy, e));
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn pipeline(plugins: Vec<Plugin<i32>>) -> PluginPipeline<i32> {
        PluginPipeline::new(
            plugins.into_iter().map(Arc::new).collect(),
            HookTimeouts::default(),
        )
        .unwrap()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = PluginPipeline::<i32>::new(
            vec![
                Arc::new(Plugin::builder("same").build()),
                Arc::new(Plugin::builder("other").build()),
                Arc::new(Plugin::builder("same").build()),
            ],
            HookTimeouts::default(),
        );

        match result {
            Err(ReactiveError::PluginRejected { plugin, reason, .. }) => {
                assert_eq!(plugin, "same");
                assert!(reason.contains("duplicate"));
            }
            Err(other) => panic!("Expected PluginRejected, got {other:?}"),
            Ok(_) => panic!("Expected duplicate names to be rejected"),
        }
    }

    #[tokio::test]
    async fn before_update_folds_in_order() {
        let p = pipeline(vec![
            Plugin::<i32>::builder("add-one").before_update(|_, v| Ok(v + 1)).build(),
            Plugin::builder("noop").build(),
            Plugin::<i32>::builder("triple").before_update(|_, v| Ok(v * 3)).build(),
        ]);

        // (2 + 1) * 3, not 2 * 3 + 1
        assert_eq!(p.before_update(&0, 2).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn before_update_sees_old_value() {
        let p = pipeline(vec![Plugin::<i32>::builder("monotonic")
            .before_update(|old, new| Ok(new.max(*old)))
            .build()]);

        assert_eq!(p.before_update(&10, 3).await.unwrap(), 10);
        assert_eq!(p.before_update(&10, 12).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn before_update_stops_at_first_failure() {
        let reached = Arc::new(Mutex::new(false));
        let flag = reached.clone();
        let p = pipeline(vec![
            Plugin::<i32>::builder("guard")
                .before_update(|_, v| {
                    if v < 0 {
                        Err(HookError::rejected("negative"))
                    } else {
                        Ok(v)
                    }
                })
                .build(),
            Plugin::<i32>::builder("after-guard")
                .before_update(move |_, v| {
                    *flag.lock() = true;
                    Ok(v)
                })
                .build(),
        ]);

        let failure = p.before_update(&0, -1).await.unwrap_err();
        assert_eq!(failure.plugin, "guard");
        assert_eq!(failure.stage, HookStage::BeforeUpdate);
        assert!(!*reached.lock());
    }

    #[tokio::test]
    async fn async_hooks_are_awaited_in_sequence() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let slow_log = log.clone();
        let fast_log = log.clone();
        let p = pipeline(vec![
            Plugin::builder("slow")
                .after_update_async(move |v| {
                    let log = slow_log.clone();
                    async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        log.lock().push(format!("slow:{v}"));
                        Ok::<_, HookError>(())
                    }
                })
                .build(),
            Plugin::builder("fast")
                .after_update(move |v| {
                    fast_log.lock().push(format!("fast:{v}"));
                    Ok(())
                })
                .build(),
        ]);

        assert!(p.after_update(&7).await.is_empty());
        assert_eq!(*log.lock(), vec!["slow:7".to_string(), "fast:7".to_string()]);
    }

    #[tokio::test]
    async fn after_update_collects_failures_and_continues() {
        let ran = Arc::new(Mutex::new(0));
        let counter = ran.clone();
        let p = pipeline(vec![
            Plugin::builder("broken")
                .after_update(|_| Err(HookError::rejected("boom")))
                .build(),
            Plugin::builder("counter")
                .after_update(move |_| {
                    *counter.lock() += 1;
                    Ok(())
                })
                .build(),
        ]);

        let failures = p.after_update(&1).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].plugin, "broken");
        assert_eq!(*ran.lock(), 1);
    }

    #[tokio::test]
    async fn hook_timeout_counts_as_failure() {
        let p = PluginPipeline::new(
            vec![Arc::new(
                Plugin::<i32>::builder("stuck")
                    .before_update_async(|_, v| async move {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        Ok::<_, HookError>(v)
                    })
                    .build(),
            )],
            HookTimeouts {
                hook: Some(Duration::from_millis(10)),
                destroy: Duration::from_millis(10),
            },
        )
        .unwrap();

        let failure = p.before_update(&0, 1).await.unwrap_err();
        assert_eq!(failure.error, HookError::TimedOut { timeout_ms: 10 });
    }

    #[tokio::test]
    async fn before_create_threads_config() {
        let p = pipeline(vec![
            Plugin::builder("seed")
                .before_create(|c| Ok(ReactiveConfig { initial_value: 5, ..c }))
                .build(),
            Plugin::builder("bump")
                .before_create(|c| {
                    let next = c.initial_value + 1;
                    Ok(ReactiveConfig { initial_value: next, ..c })
                })
                .build(),
        ]);

        let config = p.before_create(ReactiveConfig::new(0)).await.unwrap();
        assert_eq!(config.initial_value, 6);
    }
}
