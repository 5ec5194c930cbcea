use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::SchedulerError;
use crate::ir::node::OperatorNode;

/// The operator workload as a DAG: an insertion-ordered node table plus an
/// explicit, producer-supplied edge list (producer id -> consumer id).
///
/// Insertion order is preserved (via [`IndexMap`]) rather than using a plain
/// `HashMap`, so that any traversal seeded from node order is deterministic
/// across runs on the same input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorGraph {
    pub nodes: IndexMap<String, OperatorNode>,
    pub edges: Vec<(String, String)>,
}

impl OperatorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: OperatorNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_edge(&mut self, producer: impl Into<String>, consumer: impl Into<String>) {
        self.edges.push((producer.into(), consumer.into()));
    }

    /// Node ids that appear only in edges, never as a declared node.
    pub fn dangling_edge_refs(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for (from, to) in &self.edges {
            if !self.nodes.contains_key(from) && !missing.contains(from) {
                missing.push(from.clone());
            }
            if !self.nodes.contains_key(to) && !missing.contains(to) {
                missing.push(to.clone());
            }
        }
        missing
    }

    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, to)| to == id)
            .map(|(from, _)| from.as_str())
            .collect()
    }

    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(from, _)| from == id)
            .map(|(_, to)| to.as_str())
            .collect()
    }

    /// Nodes with no predecessors, in node-declaration order.
    pub fn entry_points(&self) -> Vec<String> {
        let with_preds: HashSet<&str> = self.edges.iter().map(|(_, to)| to.as_str()).collect();
        self.nodes
            .keys()
            .filter(|id| !with_preds.contains(id.as_str()))
            .cloned()
            .collect()
    }

    fn reverse_adjacency(&self) -> IndexMap<String, Vec<String>> {
        let mut rev: IndexMap<String, Vec<String>> =
            self.nodes.keys().map(|k| (k.clone(), Vec::new())).collect();
        for (from, to) in &self.edges {
            rev.entry(to.clone()).or_default().push(from.clone());
        }
        rev
    }

    fn forward_adjacency(&self) -> IndexMap<String, Vec<String>> {
        let mut fwd: IndexMap<String, Vec<String>> =
            self.nodes.keys().map(|k| (k.clone(), Vec::new())).collect();
        for (from, to) in &self.edges {
            fwd.entry(from.clone()).or_default().push(to.clone());
        }
        fwd
    }

    /// Kahn's algorithm: a deterministic topological order, or
    /// `CycleDetected` carrying the offending cycle's node ids.
    ///
    /// O(V + E): each edge is visited once to build in-degrees and once
    /// again while draining the queue.
    pub fn topological_order(&self) -> Result<Vec<String>, SchedulerError> {
        let fwd = self.forward_adjacency();
        let rev = self.reverse_adjacency();

        let mut in_degree: IndexMap<String, usize> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), rev.get(id).map(|p| p.len()).unwrap_or(0)))
            .collect();

        let mut queue: VecDeque<String> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(id, _)| id.clone())
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            if let Some(successors) = fwd.get(&id) {
                for succ in successors {
                    if let Some(deg) = in_degree.get_mut(succ) {
                        *deg -= 1;
                        if *deg == 0 {
                            queue.push_back(succ.clone());
                        }
                    }
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            Err(SchedulerError::CycleDetected {
                cycle: self.find_a_cycle(),
            })
        }
    }

    /// DFS-based cycle extraction (three-color marking), used only to
    /// produce a human-readable cycle path once Kahn's algorithm has
    /// already established that a cycle exists.
    fn find_a_cycle(&self) -> Vec<String> {
        let fwd = self.forward_adjacency();
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }
        let mut color: IndexMap<String, Color> =
            self.nodes.keys().map(|id| (id.clone(), Color::White)).collect();
        let mut path = Vec::new();

        fn visit(
            node: &str,
            fwd: &IndexMap<String, Vec<String>>,
            color: &mut IndexMap<String, Color>,
            path: &mut Vec<String>,
        ) -> Option<Vec<String>> {
            color.insert(node.to_string(), Color::Gray);
            path.push(node.to_string());
            if let Some(successors) = fwd.get(node) {
                for succ in successors {
                    match color.get(succ).copied().unwrap_or(Color::White) {
                        Color::White => {
                            if let Some(cycle) = visit(succ, fwd, color, path) {
                                return Some(cycle);
                            }
                        }
                        Color::Gray => {
                            let start = path.iter().position(|n| n == succ).unwrap_or(0);
                            let mut cycle = path[start..].to_vec();
                            cycle.push(succ.clone());
                            return Some(cycle);
                        }
                        Color::Black => {}
                    }
                }
            }
            path.pop();
            color.insert(node.to_string(), Color::Black);
            None
        }

        for id in self.nodes.keys() {
            if color.get(id).copied() == Some(Color::White) {
                if let Some(cycle) = visit(id, &fwd, &mut color, &mut path) {
                    return cycle;
                }
            }
        }
        Vec::new()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
