//! Service dependency graph using `petgraph`.
//!
//! Builds a directed graph from `depends_on` declarations and yields a
//! deterministic visiting order with dependencies first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use runcgen_common::error::{Result, RuncgenError};

/// A dependency graph of services.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: petgraph::Graph<String, ()>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: petgraph::Graph::new(),
        }
    }

    /// Adds a service node to the graph.
    ///
    /// Node indices are handed out in insertion order.
    pub fn add_service(&mut self, name: impl Into<String>) -> NodeIndex {
        self.graph.add_node(name.into())
    }

    /// Adds a dependency edge: `dependent` depends on `dependency`.
    ///
    /// The graph edge points from `dependency` to `dependent`
    /// so that ordering yields dependencies first.
    pub fn add_dependency(&mut self, dependent: NodeIndex, dependency: NodeIndex) {
        let _ = self.graph.add_edge(dependency, dependent, ());
    }

    /// Returns the name stored at a node.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Returns a topological ordering of the nodes.
    ///
    /// Among nodes whose dependencies are all satisfied, the one added
    /// first is emitted first.
    ///
    /// # Errors
    ///
    /// Returns an error naming the unresolvable services if the graph
    /// contains cycles.
    pub fn resolve_order(&self) -> Result<Vec<NodeIndex>> {
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|n| pending[n.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                pending[next.index()] -= 1;
                if pending[next.index()] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() < self.graph.node_count() {
            let services = self
                .graph
                .node_indices()
                .filter(|n| pending[n.index()] > 0)
                .filter_map(|n| self.name(n).map(str::to_string))
                .collect();
            return Err(RuncgenError::CyclicDependency { services });
        }
        Ok(order)
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(graph: &DependencyGraph, order: &[NodeIndex]) -> Vec<String> {
        order
            .iter()
            .filter_map(|&idx| graph.name(idx).map(str::to_string))
            .collect()
    }

    #[test]
    fn empty_graph_resolves_to_empty() {
        let graph = DependencyGraph::new();
        let order = graph.resolve_order().expect("should resolve");
        assert!(order.is_empty());
    }

    #[test]
    fn linear_dependency_chain() {
        let mut graph = DependencyGraph::new();
        let web = graph.add_service("web");
        let db = graph.add_service("db");
        graph.add_dependency(web, db);

        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(names(&graph, &order), vec!["db", "web"]);
    }

    #[test]
    fn diamond_dependency() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_service("a");
        let b = graph.add_service("b");
        let c = graph.add_service("c");
        let d = graph.add_service("d");
        graph.add_dependency(a, b);
        graph.add_dependency(a, c);
        graph.add_dependency(b, d);
        graph.add_dependency(c, d);

        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(names(&graph, &order), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn repeated_dependency_edge_still_resolves() {
        let mut graph = DependencyGraph::new();
        let web = graph.add_service("web");
        let db = graph.add_service("db");
        graph.add_dependency(web, db);
        graph.add_dependency(web, db);

        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(names(&graph, &order), vec!["db", "web"]);
    }

    #[test]
    fn cycle_detection_names_members() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_service("a");
        let b = graph.add_service("b");
        let _ = graph.add_service("free");
        graph.add_dependency(a, b);
        graph.add_dependency(b, a);

        let err = graph.resolve_order().unwrap_err();
        assert!(
            matches!(
                err,
                RuncgenError::CyclicDependency { ref services } if *services == ["a", "b"]
            ),
            "got: {err}"
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_service("a");
        graph.add_dependency(a, a);
        assert!(graph.resolve_order().is_err());
    }
}
