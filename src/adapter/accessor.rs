//! Signal-style `(accessor(), set)` pair.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::adapter::{FrameworkAdapter, Setter, Subscription};
use crate::error::Result;
use crate::reactive::ReactiveHandle;
use crate::system::ComponentSystem;

/// Zero-argument function returning the latest value the adapter saw.
pub struct Accessor<T> {
    read: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            read: Arc::clone(&self.read),
        }
    }
}

impl<T> Accessor<T> {
    pub fn get(&self) -> T {
        (self.read)()
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

pub struct AccessorBinding<T> {
    pub accessor: Accessor<T>,
    pub setter: Setter<T>,
    cell: Arc<RwLock<T>>,
}

pub struct AccessorAdapter<T> {
    setter: Setter<T>,
    subscription: Subscription<T>,
}

impl<T: Clone + Send + Sync + 'static> AccessorAdapter<T> {
    pub fn new(system: &ComponentSystem<T>, handle: &ReactiveHandle<T>) -> Self {
        Self {
            setter: Setter::new(system, handle),
            subscription: Subscription::new(handle),
        }
    }

    /// Set up from the reactive's current value.
    pub fn bind(&mut self) -> Result<AccessorBinding<T>> {
        let initial = self.setter.current()?;
        Ok(self.setup(initial))
    }
}

impl<T: Clone + Send + Sync + 'static> FrameworkAdapter<T> for AccessorAdapter<T> {
    type State = AccessorBinding<T>;

    fn setup(&mut self, initial: T) -> AccessorBinding<T> {
        let cell = Arc::new(RwLock::new(initial));
        let reader = Arc::clone(&cell);
        AccessorBinding {
            accessor: Accessor {
                read: Arc::new(move || reader.read().clone()),
            },
            setter: self.setter.clone(),
            cell,
        }
    }

    fn update(&mut self, state: &mut AccessorBinding<T>, value: T) {
        *state.cell.write() = value;
    }

    fn cleanup(&mut self) {
        self.subscription.close();
    }

    fn subscription(&mut self) -> &mut Subscription<T> {
        &mut self.subscription
    }
}
