//! Reactive values: creation requests, the live entity, and its lifecycle.

mod entity;
mod lifecycle;
mod types;

pub(crate) use entity::{Reactive, ReactiveParts};
pub use entity::ReactiveHandle;
pub use lifecycle::{InvalidTransition, LifecycleEvent, LifecycleState};
pub use types::{
    ComputeFn, DependencyValues, Derivation, EffectFn, ReactiveConfig, ReactiveKind,
    META_FRAMEWORK, META_NAME,
};
