//! Dependency tracking and evaluation ordering for registered formulas

use ahash::{AHashMap, AHashSet};
use carbon_calc_core::{Error, Result};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Dependency graph over formula identifiers
///
/// Tracks, per formula, the formulas that consume its result and the count
/// of its own not-yet-satisfied formula dependencies. Dependencies satisfied
/// by input variables never enter the graph; they are roots with no edge.
///
/// Nodes are kept in registration order, which makes the schedule produced
/// by [`topo_order`](DependencyGraph::topo_order) deterministic.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: IndexMap<String, NodeState>,
}

#[derive(Debug, Default)]
struct NodeState {
    /// Formulas that consume this node's result, in edge insertion order
    dependents: Vec<String>,
    /// Count of formula-to-formula dependencies not yet scheduled
    in_degree: usize,
    /// Whether this node is a registered formula. An edge can name a node
    /// before (or without) its registration; only registered nodes are
    /// scheduled.
    registered: bool,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a formula registration
    pub fn add_node(&mut self, id: &str) {
        self.nodes.entry(id.to_string()).or_default().registered = true;
    }

    /// Record an edge: `dependent` consumes the result of `dependency`
    ///
    /// `dependency` may be a formula that has not been registered yet (a
    /// forward reference) or one that never will be (caught by the
    /// registry's closure validation before scheduling).
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) {
        self.nodes
            .entry(dependency.to_string())
            .or_default()
            .dependents
            .push(dependent.to_string());
        self.nodes.entry(dependent.to_string()).or_default().in_degree += 1;
    }

    /// Number of registered formulas
    pub fn registered_count(&self) -> usize {
        self.nodes.values().filter(|n| n.registered).count()
    }

    /// Compute a linear evaluation order via Kahn's algorithm
    ///
    /// The queue is seeded with zero-in-degree formulas in registration
    /// order and drained FIFO, so ties among independent formulas break
    /// deterministically toward registration order.
    ///
    /// Fails with [`Error::CyclicDependency`] naming the unscheduled
    /// remainder if the order cannot include every registered formula. This
    /// is the sole cycle-detection mechanism.
    pub fn topo_order(&self) -> Result<Vec<String>> {
        let mut in_degree: AHashMap<&str, usize> = AHashMap::with_capacity(self.nodes.len());
        let mut queue: VecDeque<&str> = VecDeque::new();

        for (id, node) in &self.nodes {
            if !node.registered {
                continue;
            }
            in_degree.insert(id.as_str(), node.in_degree);
            if node.in_degree == 0 {
                queue.push_back(id.as_str());
            }
        }

        let total = in_degree.len();
        let mut order: Vec<String> = Vec::with_capacity(total);
        let mut scheduled: AHashSet<&str> = AHashSet::with_capacity(total);

        while let Some(id) = queue.pop_front() {
            order.push(id.to_string());
            scheduled.insert(id);

            if let Some(node) = self.nodes.get(id) {
                for dependent in &node.dependents {
                    if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 && !scheduled.contains(dependent.as_str()) {
                            queue.push_back(dependent.as_str());
                        }
                    }
                }
            }
        }

        if order.len() < total {
            let unresolved: Vec<String> = self
                .nodes
                .iter()
                .filter(|(id, node)| node.registered && !scheduled.contains(id.as_str()))
                .map(|(id, _)| id.clone())
                .collect();
            return Err(Error::CyclicDependency { unresolved });
        }

        Ok(order)
    }
}
