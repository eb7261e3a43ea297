//! Hooks-style `(value, set)` pair.

use crate::adapter::{FrameworkAdapter, Setter, Subscription};
use crate::error::Result;
use crate::reactive::ReactiveHandle;
use crate::system::ComponentSystem;

/// A plain value snapshot plus a setter.
pub struct ValueBinding<T> {
    pub value: T,
    pub setter: Setter<T>,
}

pub struct ValueAdapter<T> {
    setter: Setter<T>,
    subscription: Subscription<T>,
}

impl<T: Clone + Send + Sync + 'static> ValueAdapter<T> {
    pub fn new(system: &ComponentSystem<T>, handle: &ReactiveHandle<T>) -> Self {
        Self {
            setter: Setter::new(system, handle),
            subscription: Subscription::new(handle),
        }
    }

    /// Set up from the reactive's current value.
    pub fn bind(&mut self) -> Result<ValueBinding<T>> {
        let initial = self.setter.current()?;
        Ok(self.setup(initial))
    }
}

impl<T: Clone + Send + Sync + 'static> FrameworkAdapter<T> for ValueAdapter<T> {
    type State = ValueBinding<T>;

    fn setup(&mut self, initial: T) -> ValueBinding<T> {
        ValueBinding {
            value: initial,
            setter: self.setter.clone(),
        }
    }

    fn update(&mut self, state: &mut ValueBinding<T>, value: T) {
        state.value = value;
    }

    fn cleanup(&mut self) {
        self.subscription.close();
    }

    fn subscription(&mut self) -> &mut Subscription<T> {
        &mut self.subscription
    }
}
