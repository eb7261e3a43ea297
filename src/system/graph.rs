//! Dependency graph over reactive ids.
//!
//! Edges run from a dependency to its dependent (`a → b` when `b` declares
//! `a`), so walking forward from an id visits everything it invalidates.
//! Ids that are declared but not live are nodes too; that is what lets a
//! cycle through a forward reference be caught.

use std::collections::HashSet;

use petgraph::algo::{astar, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Bfs;
use petgraph::Direction;

pub(crate) struct DependencyGraph<'a> {
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> DependencyGraph<'a> {
    /// Build from `(id, declared dependencies)` pairs of live reactives.
    pub(crate) fn from_declarations<I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut graph = DiGraphMap::new();
        for (id, dependencies) in declarations {
            graph.add_node(id);
            for dependency in dependencies {
                graph.add_edge(dependency.as_str(), id, ());
            }
        }
        Self { graph }
    }

    /// The cycle `id` would close by declaring `dependencies`, if any.
    ///
    /// The returned path starts and ends at `id`.
    pub(crate) fn cycle_through(&self, id: &str, dependencies: &[String]) -> Option<Vec<String>> {
        for dependency in dependencies {
            let dependency = dependency.as_str();
            if dependency == id {
                return Some(vec![id.to_string(), id.to_string()]);
            }
            let (Some(start), Some(_)) = (self.node(id), self.node(dependency)) else {
                continue;
            };
            // Adding `dependency → id` closes a cycle iff `id` already reaches `dependency`.
            let found = astar(&self.graph, start, |n| n == dependency, |_| 1u32, |_| 0u32);
            if let Some((_, path)) = found {
                let mut cycle: Vec<String> = path.into_iter().map(str::to_string).collect();
                cycle.push(id.to_string());
                return Some(cycle);
            }
        }
        None
    }

    /// Ids that directly declare `id` as a dependency.
    pub(crate) fn direct_dependents(&self, id: &str) -> Vec<String> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        let mut dependents: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(str::to_string)
            .collect();
        dependents.sort();
        dependents
    }

    /// Every id transitively invalidated by `source`, in topological order.
    ///
    /// `source` itself is not included.
    pub(crate) fn downstream_of(&self, source: &str) -> Vec<String> {
        let Some(start) = self.node(source) else {
            return Vec::new();
        };

        let mut reached = Vec::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(node) = bfs.next(&self.graph) {
            if node != start {
                reached.push(node);
            }
        }
        if reached.is_empty() {
            return Vec::new();
        }

        match toposort(&self.graph, None) {
            Ok(order) => {
                let reached: HashSet<&str> = reached.into_iter().collect();
                order
                    .into_iter()
                    .filter(|node| reached.contains(node))
                    .map(str::to_string)
                    .collect()
            }
            Err(cycle) => {
                tracing::warn!(
                    node = %cycle.node_id(),
                    "dependency graph has a cycle, falling back to breadth-first order"
                );
                reached.into_iter().map(str::to_string).collect()
            }
        }
    }

    /// Every node, dependents before their dependencies.
    pub(crate) fn teardown_order(&self) -> Vec<String> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().rev().map(str::to_string).collect(),
            Err(cycle) => {
                tracing::warn!(
                    node = %cycle.node_id(),
                    "dependency graph has a cycle, tearing down in arbitrary order"
                );
                self.graph.nodes().map(str::to_string).collect()
            }
        }
    }

    fn node(&self, id: &str) -> Option<&'a str> {
        self.graph.nodes().find(|n| *n == id)
    }
}
