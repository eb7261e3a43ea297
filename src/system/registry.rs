//! Live-instance registry of one component system.
//!
//! The lock is only ever held for map access, never across an await.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{ReactiveError, Result};
use crate::reactive::{DependencyValues, Reactive};
use crate::system::graph::DependencyGraph;

pub(crate) struct Registry<T> {
    live: RwLock<HashMap<String, Arc<Reactive<T>>>>,
}

impl<T: Clone> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            live: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<Reactive<T>>> {
        self.live.read().get(id).cloned()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.live.read().contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.live.read().len()
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.live.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Check that `id` is free and `dependencies` close no cycle.
    pub(crate) fn validate(&self, id: &str, dependencies: &[String]) -> Result<()> {
        let live = self.live.read();
        Self::check(&live, id, dependencies)
    }

    /// Validate and insert atomically.
    pub(crate) fn insert(&self, reactive: Arc<Reactive<T>>) -> Result<()> {
        let mut live = self.live.write();
        Self::check(&live, &reactive.id, &reactive.dependencies)?;
        live.insert(reactive.id.clone(), reactive);
        Ok(())
    }

    /// Remove `reactive` if it is still the one registered under its id.
    pub(crate) fn remove(&self, reactive: &Arc<Reactive<T>>) -> bool {
        let mut live = self.live.write();
        match live.get(&reactive.id) {
            Some(current) if Arc::ptr_eq(current, reactive) => {
                live.remove(&reactive.id);
                true
            }
            _ => false,
        }
    }

    /// Current values of `dependencies`, `None` for ids that are not live.
    pub(crate) fn dependency_values(&self, dependencies: &[String]) -> DependencyValues<T> {
        let live = self.live.read();
        DependencyValues::new(
            dependencies
                .iter()
                .map(|id| (id.clone(), live.get(id).map(|r| r.value())))
                .collect(),
        )
    }

    /// Snapshot of `(id, declared dependencies)` for graph queries.
    pub(crate) fn declarations(&self) -> Vec<(String, Vec<String>)> {
        self.live
            .read()
            .values()
            .map(|r| (r.id.clone(), r.dependencies.clone()))
            .collect()
    }

    fn check(
        live: &HashMap<String, Arc<Reactive<T>>>,
        id: &str,
        dependencies: &[String],
    ) -> Result<()> {
        if live.contains_key(id) {
            return Err(ReactiveError::DuplicateId { id: id.to_string() });
        }

        let graph = DependencyGraph::from_declarations(
            live.values()
                .map(|r| (r.id.as_str(), r.dependencies.as_slice())),
        );
        if let Some(path) = graph.cycle_through(id, dependencies) {
            return Err(ReactiveError::CyclicDependency {
                id: id.to_string(),
                path,
            });
        }

        Ok(())
    }
}

/// Build a graph over a declarations snapshot.
pub(crate) fn graph_of(declarations: &[(String, Vec<String>)]) -> DependencyGraph<'_> {
    DependencyGraph::from_declarations(
        declarations
            .iter()
            .map(|(id, deps)| (id.as_str(), deps.as_slice())),
    )
}
