//! Framework-agnostic reactive values with a pluggable lifecycle.
//!
//! A [`ComponentSystem`] creates, updates and destroys reactive values,
//! running each request's [`Plugin`]s at fixed lifecycle points. Adapters
//! in [`adapter`] expose a reactive in whatever shape a UI framework
//! expects.
//!
//! ```no_run
//! use anystate::{ComponentSystem, Plugin, ReactiveConfig};
//!
//! # async fn demo() -> anystate::Result<()> {
//! let system = ComponentSystem::new();
//! let double = Plugin::builder("double").before_update(|_, v: i32| Ok(v * 2)).build();
//!
//! system
//!     .create(ReactiveConfig::new(0).with_id("counter").with_plugin(double))
//!     .await?;
//! system.set("counter", 5).await?;
//! assert_eq!(system.get("counter")?, 10);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod logging;
pub mod naming;
pub mod plugin;
pub mod reactive;
pub mod system;

pub use config::{ConfigError, EngineConfig};
pub use error::{HookError, HookFailure, HookStage, ReactiveError, Result};
pub use plugin::{HookFuture, Plugin, PluginBuilder};
pub use reactive::{
    DependencyValues, Derivation, LifecycleState, ReactiveConfig, ReactiveHandle, ReactiveKind,
};
pub use system::{ComponentSystem, ShutdownReport};
