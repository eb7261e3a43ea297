//! Mutable reference object with a `value` field.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::adapter::{FrameworkAdapter, Setter, Subscription};
use crate::error::Result;
use crate::reactive::ReactiveHandle;
use crate::system::ComponentSystem;

/// Shared reference object. Clones see the same `value`.
pub struct RefBinding<T> {
    value: Arc<RwLock<T>>,
    setter: Setter<T>,
}

impl<T> Clone for RefBinding<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            setter: self.setter.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> RefBinding<T> {
    pub fn value(&self) -> T {
        self.value.read().clone()
    }

    /// Assign through the update pipeline; the field then holds the
    /// committed (possibly transformed) value.
    pub async fn set_value(&self, value: T) -> Result<()> {
        self.setter.set(value).await?;
        let committed = self.setter.current()?;
        *self.value.write() = committed;
        Ok(())
    }
}

pub struct RefAdapter<T> {
    setter: Setter<T>,
    subscription: Subscription<T>,
}

impl<T: Clone + Send + Sync + 'static> RefAdapter<T> {
    pub fn new(system: &ComponentSystem<T>, handle: &ReactiveHandle<T>) -> Self {
        Self {
            setter: Setter::new(system, handle),
            subscription: Subscription::new(handle),
        }
    }

    /// Set up from the reactive's current value.
    pub fn bind(&mut self) -> Result<RefBinding<T>> {
        let initial = self.setter.current()?;
        Ok(self.setup(initial))
    }
}

impl<T: Clone + Send + Sync + 'static> FrameworkAdapter<T> for RefAdapter<T> {
    type State = RefBinding<T>;

    fn setup(&mut self, initial: T) -> RefBinding<T> {
        RefBinding {
            value: Arc::new(RwLock::new(initial)),
            setter: self.setter.clone(),
        }
    }

    fn update(&mut self, state: &mut RefBinding<T>, value: T) {
        *state.value.write() = value;
    }

    fn cleanup(&mut self) {
        self.subscription.close();
    }

    fn subscription(&mut self) -> &mut Subscription<T> {
        &mut self.subscription
    }
}
