//! Framework adapters that expose a reactive in a UI framework's native shape.
//!
//! ```text
//! ValueAdapter     → (value, set)          hooks-style state pair
//! AccessorAdapter  → (accessor(), set)     signal getter + setter
//! RefAdapter       → ref.value             mutable reference object
//! ```
//!
//! Adapters sit outside the core: they only read through
//! [`ReactiveHandle`] and write through [`ComponentSystem::set`].

mod accessor;
mod detect;
mod reference;
mod value;

pub use accessor::{Accessor, AccessorAdapter, AccessorBinding};
pub use detect::{BindingShape, Framework};
pub use reference::{RefAdapter, RefBinding};
pub use value::{ValueAdapter, ValueBinding};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::reactive::ReactiveHandle;
use crate::system::ComponentSystem;

/// Capability set every framework adapter provides.
pub trait FrameworkAdapter<T: Clone> {
    /// Framework-native state shape.
    type State;

    /// Build the framework-side state from `initial`.
    fn setup(&mut self, initial: T) -> Self::State;

    /// Push a committed value into the framework-side state.
    fn update(&mut self, state: &mut Self::State, value: T);

    /// Detach from the reactive. Later refreshes are no-ops.
    fn cleanup(&mut self);

    fn subscription(&mut self) -> &mut Subscription<T>;

    /// Apply the latest committed value to `state` if it changed since the
    /// last refresh. Returns whether `state` was updated.
    fn refresh(&mut self, state: &mut Self::State) -> bool {
        match self.subscription().take_changed() {
            Some(value) => {
                self.update(state, value);
                true
            }
            None => false,
        }
    }
}

/// Setter wired back into the component system.
pub struct Setter<T> {
    system: ComponentSystem<T>,
    id: String,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
            id: self.id.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Setter<T> {
    pub fn new(system: &ComponentSystem<T>, handle: &ReactiveHandle<T>) -> Self {
        Self {
            system: system.clone(),
            id: handle.id().to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run the update pipeline and wait for it.
    pub async fn set(&self, value: T) -> Result<()> {
        self.system.set(&self.id, value).await
    }

    /// Start the update pipeline in the background, for synchronous
    /// callbacks. Dropping the returned handle does not stop the update.
    pub fn spawn(&self, value: T) -> JoinHandle<Result<()>> {
        let setter = self.clone();
        tokio::spawn(async move { setter.set(value).await })
    }

    /// Latest committed value, if the reactive is still live.
    pub(crate) fn current(&self) -> Result<T> {
        self.system.get(&self.id)
    }
}

/// Change feed from a reactive to an adapter.
pub struct Subscription<T> {
    receiver: Option<watch::Receiver<T>>,
}

impl<T: Clone> Subscription<T> {
    pub fn new(handle: &ReactiveHandle<T>) -> Self {
        Self {
            receiver: Some(handle.subscribe()),
        }
    }

    /// Latest value if it changed since last taken.
    pub fn take_changed(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;
        match receiver.has_changed() {
            Ok(true) => Some(receiver.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next commit. `None` once closed or cancelled.
    pub async fn changed(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;
        receiver.changed().await.ok()?;
        Some(receiver.borrow_and_update().clone())
    }

    pub fn close(&mut self) {
        self.receiver = None;
    }

    pub fn is_closed(&self) -> bool {
        self.receiver.is_none()
    }
}
