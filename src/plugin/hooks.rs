//! Plugin definition: a named record of optional lifecycle interceptors.
//!
//! Every slot is fixed when the plugin is built. The pipeline checks
//! `Option`s, it never probes a plugin at invocation time.

use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{HookError, HookStage};
use crate::reactive::{ReactiveConfig, ReactiveHandle};

/// Boxed future returned by interceptors.
pub type HookFuture<'a, R> = Pin<Box<dyn Future<Output = R> + Send + 'a>>;

pub(crate) type BeforeCreateFn<T> = Arc<
    dyn Fn(ReactiveConfig<T>) -> HookFuture<'static, Result<ReactiveConfig<T>, HookError>>
        + Send
        + Sync,
>;
pub(crate) type AfterCreateFn<T> =
    Arc<dyn Fn(ReactiveHandle<T>) -> HookFuture<'static, Result<(), HookError>> + Send + Sync>;
pub(crate) type BeforeUpdateFn<T> =
    Arc<dyn Fn(T, T) -> HookFuture<'static, Result<T, HookError>> + Send + Sync>;
pub(crate) type AfterUpdateFn<T> =
    Arc<dyn Fn(T) -> HookFuture<'static, Result<(), HookError>> + Send + Sync>;
pub(crate) type BeforeDestroyFn<T> =
    Arc<dyn Fn(ReactiveHandle<T>) -> HookFuture<'static, Result<(), HookError>> + Send + Sync>;

/// A named bundle of lifecycle interceptors.
///
/// Built with [`Plugin::builder`]; immutable afterwards.
pub struct Plugin<T> {
    name: String,
    pub(crate) before_create: Option<BeforeCreateFn<T>>,
    pub(crate) after_create: Option<AfterCreateFn<T>>,
    pub(crate) before_update: Option<BeforeUpdateFn<T>>,
    pub(crate) after_update: Option<AfterUpdateFn<T>>,
    pub(crate) before_destroy: Option<BeforeDestroyFn<T>>,
}

impl<T> Plugin<T> {
    pub fn builder(name: impl Into<String>) -> PluginBuilder<T> {
        PluginBuilder {
            plugin: Plugin {
                name: name.into(),
                before_create: None,
                after_create: None,
                before_update: None,
                after_update: None,
                before_destroy: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this plugin intercepts `stage`.
    pub fn intercepts(&self, stage: HookStage) -> bool {
        match stage {
            HookStage::BeforeCreate => self.before_create.is_some(),
            HookStage::AfterCreate => self.after_create.is_some(),
            HookStage::BeforeUpdate => self.before_update.is_some(),
            HookStage::AfterUpdate => self.after_update.is_some(),
            HookStage::BeforeDestroy => self.before_destroy.is_some(),
            HookStage::Effect => false,
        }
    }
}

impl<T> fmt::Debug for Plugin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("before_create", &self.before_create.is_some())
            .field("after_create", &self.after_create.is_some())
            .field("before_update", &self.before_update.is_some())
            .field("after_update", &self.after_update.is_some())
            .field("before_destroy", &self.before_destroy.is_some())
            .finish()
    }
}

/// Builder for [`Plugin`].
///
/// Each slot has a synchronous form taking a plain closure and an `_async`
/// form taking a closure that returns a future.
pub struct PluginBuilder<T> {
    plugin: Plugin<T>,
}

impl<T: Send + 'static> PluginBuilder<T> {
    pub fn before_create<F>(self, f: F) -> Self
    where
        F: Fn(ReactiveConfig<T>) -> Result<ReactiveConfig<T>, HookError> + Send + Sync + 'static,
    {
        self.before_create_async(move |config| future::ready(f(config)))
    }

    pub fn before_create_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ReactiveConfig<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReactiveConfig<T>, HookError>> + Send + 'static,
    {
        self.plugin.before_create = Some(Arc::new(
            move |config: ReactiveConfig<T>| -> HookFuture<'static, Result<ReactiveConfig<T>, HookError>> {
                Box::pin(f(config))
            },
        ));
        self
    }

    pub fn after_create<F>(self, f: F) -> Self
    where
        F: Fn(&ReactiveHandle<T>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.after_create_async(move |handle| future::ready(f(&handle)))
    }

    pub fn after_create_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ReactiveHandle<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.plugin.after_create = Some(Arc::new(
            move |handle: ReactiveHandle<T>| -> HookFuture<'static, Result<(), HookError>> {
                Box::pin(f(handle))
            },
        ));
        self
    }

    /// Transform a proposed value. Receives `(old, new)`.
    pub fn before_update<F>(self, f: F) -> Self
    where
        F: Fn(&T, T) -> Result<T, HookError> + Send + Sync + 'static,
    {
        self.before_update_async(move |old, new| future::ready(f(&old, new)))
    }

    pub fn before_update_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(T, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, HookError>> + Send + 'static,
    {
        self.plugin.before_update = Some(Arc::new(
            move |old: T, new: T| -> HookFuture<'static, Result<T, HookError>> {
                Box::pin(f(old, new))
            },
        ));
        self
    }

    pub fn after_update<F>(self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.after_update_async(move |value| future::ready(f(&value)))
    }

    pub fn after_update_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.plugin.after_update = Some(Arc::new(
            move |value: T| -> HookFuture<'static, Result<(), HookError>> {
                Box::pin(f(value))
            },
        ));
        self
    }

    pub fn before_destroy<F>(self, f: F) -> Self
    where
        F: Fn(&ReactiveHandle<T>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.before_destroy_async(move |handle| future::ready(f(&handle)))
    }

    pub fn before_destroy_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ReactiveHandle<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.plugin.before_destroy = Some(Arc::new(
            move |handle: ReactiveHandle<T>| -> HookFuture<'static, Result<(), HookError>> {
                Box::pin(f(handle))
            },
        ));
        self
    }

    pub fn build(self) -> Plugin<T> {
        self.plugin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_recorded_at_build_time() {
        let plugin = Plugin::<i32>::builder("double")
            .before_update(|_, new| Ok(new * 2))
            .after_update(|_| Ok(()))
            .build();

        assert_eq!(plugin.name(), "double");
        assert!(plugin.intercepts(HookStage::BeforeUpdate));
        assert!(plugin.intercepts(HookStage::AfterUpdate));
        assert!(!plugin.intercepts(HookStage::BeforeCreate));
        assert!(!plugin.intercepts(HookStage::AfterCreate));
        assert!(!plugin.intercepts(HookStage::BeforeDestroy));
    }

    #[test]
    fn empty_plugin_intercepts_nothing() {
        let plugin: Plugin<String> = Plugin::builder("noop").build();
        for stage in [
            HookStage::BeforeCreate,
            HookStage::AfterCreate,
            HookStage::BeforeUpdate,
            HookStage::AfterUpdate,
            HookStage::BeforeDestroy,
        ] {
            assert!(!plugin.intercepts(stage));
        }
    }
}
