//! Ready-made plugins.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::HookError;
use crate::plugin::Plugin;

/// Plugin that emits a `tracing` event at every lifecycle point.
pub fn logger<T>(name: impl Into<String>) -> Plugin<T>
where
    T: fmt::Debug + Send + 'static,
{
    Plugin::builder(name)
        .before_create(|config| {
            tracing::debug!(
                id = ?config.id,
                kind = %config.kind,
                initial = ?config.initial_value,
                "creating reactive"
            );
            Ok(config)
        })
        .after_create(|handle| {
            tracing::debug!(id = %handle.id(), "reactive created");
            Ok(())
        })
        .before_update(|old, new| {
            tracing::debug!(old = ?old, new = ?new, "updating reactive");
            Ok(new)
        })
        .after_update(|value| {
            tracing::debug!(value = ?value, "reactive updated");
            Ok(())
        })
        .before_destroy(|handle| {
            tracing::debug!(id = %handle.id(), "destroying reactive");
            Ok(())
        })
        .build()
}

/// Plugin that refuses updates failing `accept`.
pub fn validator<T, F>(name: impl Into<String>, reason: impl Into<String>, accept: F) -> Plugin<T>
where
    T: Send + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    let reason = reason.into();
    Plugin::builder(name)
        .before_update(move |_, new| {
            if accept(&new) {
                Ok(new)
            } else {
                Err(HookError::Rejected(reason.clone()))
            }
        })
        .build()
}

/// Records the initial value and every committed value of a reactive.
///
/// Keeps at most `limit` entries, dropping the oldest.
#[derive(Clone)]
pub struct History<T> {
    entries: Arc<Mutex<Vec<T>>>,
    limit: usize,
}

impl<T: Clone + Send + Sync + 'static> History<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            limit: limit.max(1),
        }
    }

    /// Plugin feeding this history. Attach it to one reactive.
    pub fn plugin(&self, name: impl Into<String>) -> Plugin<T> {
        let on_create = self.clone();
        let on_update = self.clone();
        Plugin::builder(name)
            .after_create(move |handle| {
                let value = handle.get().map_err(|e| HookError::Rejected(e.to_string()))?;
                on_create.record(value);
                Ok(())
            })
            .after_update(move |value| {
                on_update.record(value.clone());
                Ok(())
            })
            .build()
    }

    fn record(&self, value: T) {
        let mut entries = self.entries.lock();
        entries.push(value);
        if entries.len() > self.limit {
            let excess = entries.len() - self.limit;
            entries.drain(..excess);
        }
    }

    /// Recorded values, oldest first.
    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().clone()
    }

    /// Value before the most recent commit, if any.
    pub fn previous(&self) -> Option<T> {
        let entries = self.entries.lock();
        entries.len().checked_sub(2).map(|i| entries[i].clone())
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
